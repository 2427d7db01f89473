//! Blocking client for the inverter's local Solar API.
//!
//! Two read-only endpoints are polled once (or a few times, averaged) per
//! run: the site power flow and the storage controller. Both return JSON
//! bodies nested under `Body.Data`. Any transport failure, non-success
//! status, or missing field ends the run; there are no retries.

use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use serde::Deserialize;

use crate::error::Error;

/// Grid, solar, and inverter power at the site, in watts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerFlow {
    /// Power drawn from the grid; negative while exporting
    pub grid: i64,
    /// Solar production
    pub solar: i64,
    /// Inverter output, used as the consumption figure
    pub inverter: i64,
}

/// The storage controller object from `GetStorageRealtimeData`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct StorageController {
    /// Battery DC voltage
    #[serde(rename = "Voltage_DC")]
    pub voltage_dc: f64,
    /// Battery DC current; positive while charging
    #[serde(rename = "Current_DC")]
    pub current_dc: f64,
    /// State of charge in percent, 0 to 100
    #[serde(rename = "StateOfCharge_Relative")]
    pub state_of_charge: f64,
}

impl StorageController {
    /// DC-side battery power in watts; positive while charging.
    pub fn battery_power(&self) -> i64 {
        (self.voltage_dc * self.current_dc).round() as i64
    }

    /// State of charge as a fraction in `[0, 1]`.
    pub fn battery_percentage(&self) -> f64 {
        self.state_of_charge / 100.0
    }
}

/// One run's telemetry, optionally averaged over several samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Grid power in watts; negative while exporting
    pub grid: i64,
    /// Solar production in watts
    pub solar: i64,
    /// Consumption in watts, after the grid-export fold
    pub consumption: f64,
    /// Battery power in watts; positive while charging
    pub battery_power: i64,
    /// Battery state of charge as a fraction in `[0, 1]`
    pub battery_percentage: f64,
}

// Wire format of GetPowerFlowRealtimeData.fcgi, reduced to the fields
// the display needs. Unknown fields are ignored.

#[derive(Debug, Deserialize)]
struct PowerFlowResponse {
    #[serde(rename = "Body")]
    body: PowerFlowBody,
}

#[derive(Debug, Deserialize)]
struct PowerFlowBody {
    #[serde(rename = "Data")]
    data: PowerFlowData,
}

#[derive(Debug, Deserialize)]
struct PowerFlowData {
    #[serde(rename = "Site")]
    site: SiteNode,
    #[serde(rename = "Inverters")]
    inverters: HashMap<String, InverterNode>,
}

#[derive(Debug, Deserialize)]
struct SiteNode {
    #[serde(rename = "P_Grid")]
    p_grid: f64,
    #[serde(rename = "P_PV")]
    p_pv: f64,
}

#[derive(Debug, Deserialize)]
struct InverterNode {
    #[serde(rename = "P")]
    p: f64,
}

#[derive(Debug, Deserialize)]
struct StorageResponse {
    #[serde(rename = "Body")]
    body: StorageBody,
}

#[derive(Debug, Deserialize)]
struct StorageBody {
    #[serde(rename = "Data")]
    data: StorageData,
}

#[derive(Debug, Deserialize)]
struct StorageData {
    #[serde(rename = "Controller")]
    controller: StorageController,
}

/// Client for the inverter's Solar API.
///
/// # Example
///
/// ```rust,no_run
/// use solarstrip::InverterClient;
///
/// # fn example() -> Result<(), solarstrip::Error> {
/// let client = InverterClient::new("http://192.168.178.62");
/// let flow = client.power_flow()?;
/// println!("grid {} W, solar {} W", flow.grid, flow.solar);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct InverterClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl InverterClient {
    /// Create a client for the inverter at `base_url`.
    ///
    /// No explicit timeout is set; the transport default applies.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch the site power flow.
    pub fn power_flow(&self) -> Result<PowerFlow, Error> {
        let url = format!("{}/solar_api/v1/GetPowerFlowRealtimeData.fcgi", self.base_url);
        let body = self.fetch(&url, &[])?;
        let parsed: PowerFlowResponse = serde_json::from_str(&body)?;

        let data = parsed.body.data;
        let inverter = data
            .inverters
            .get("1")
            .ok_or_else(|| Error::Payload("inverter \"1\" missing from power flow".to_string()))?;

        Ok(PowerFlow {
            grid: data.site.p_grid as i64,
            solar: data.site.p_pv as i64,
            inverter: inverter.p as i64,
        })
    }

    /// Fetch the storage controller state for device 0.
    pub fn storage(&self) -> Result<StorageController, Error> {
        let url = format!("{}/solar_api/v1/GetStorageRealtimeData.cgi", self.base_url);
        let body = self.fetch(&url, &[("Scope", "Device"), ("DeviceId", "0")])?;
        let parsed: StorageResponse = serde_json::from_str(&body)?;
        Ok(parsed.body.data.controller)
    }

    /// Fetch telemetry, averaging `count` samples spaced `delay` apart.
    ///
    /// The first sample is always taken immediately; with `count = 1` no
    /// further fetch and no delay happens. Watt sums use floor division,
    /// consumption and charge fraction divide as floats. A net grid
    /// export is folded into consumption afterwards.
    pub fn reading(&self, count: u32, delay: Duration) -> Result<Reading, Error> {
        let mut sum = self.sample()?;
        tracing::debug!(sample = 0, ?sum, "telemetry sample");

        for n in 1..count {
            thread::sleep(delay);
            let next = self.sample()?;
            tracing::debug!(sample = n, ?next, "telemetry sample");
            sum.add(next);
        }

        Ok(average(sum, count))
    }

    fn sample(&self) -> Result<Sample, Error> {
        let flow = self.power_flow()?;
        let storage = self.storage()?;
        Ok(Sample {
            grid: flow.grid,
            solar: flow.solar,
            consumption: flow.inverter,
            battery_power: storage.battery_power(),
            battery_percentage: storage.battery_percentage(),
        })
    }

    fn fetch(&self, url: &str, query: &[(&str, &str)]) -> Result<String, Error> {
        let response = self.http.get(url).query(query).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        Ok(response.text()?)
    }
}

/// Running sums over the sampled values.
#[derive(Debug, Clone, Copy)]
struct Sample {
    grid: i64,
    solar: i64,
    consumption: i64,
    battery_power: i64,
    battery_percentage: f64,
}

impl Sample {
    fn add(&mut self, other: Sample) {
        self.grid += other.grid;
        self.solar += other.solar;
        self.consumption += other.consumption;
        self.battery_power += other.battery_power;
        self.battery_percentage += other.battery_percentage;
    }
}

fn average(sum: Sample, count: u32) -> Reading {
    let divisor = i64::from(count);
    let grid = sum.grid.div_euclid(divisor);
    let solar = sum.solar.div_euclid(divisor);
    let mut consumption = sum.consumption as f64 / f64::from(count);

    // Net export: the surplus offsets the load figure
    if grid < 0 {
        consumption += grid as f64;
    }

    Reading {
        grid,
        solar,
        consumption,
        battery_power: sum.battery_power.div_euclid(divisor),
        battery_percentage: sum.battery_percentage / f64::from(count),
    }
}
