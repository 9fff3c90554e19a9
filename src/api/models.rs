use serde::{Deserialize, Serialize};

use crate::voucher::model::{AircraftType, SeatPosition};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckVoucherRequest {
    pub flight_number: String,
    pub date: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CheckVoucherResponse {
    pub exists: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVoucherRequest {
    pub name: String,
    pub id: String,
    pub flight_number: String,
    pub date: String,
    pub aircraft: AircraftType,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GenerateVoucherResponse {
    pub success: bool,
    #[serde(default)]
    pub seats: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GetVoucherRequest {
    pub flight_number: String,
    pub date: String,
}

/// Persisted voucher as stored by the server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Voucher {
    pub id: i64,
    pub crew_name: String,
    pub crew_id: String,
    pub flight_number: String,
    pub flight_date: String,
    pub aircraft_type: String,
    pub seat1: String,
    pub seat2: String,
    pub seat3: String,
    pub created_at: String,
}

impl Voucher {
    pub fn seats(&self) -> Vec<String> {
        vec![self.seat1.clone(), self.seat2.clone(), self.seat3.clone()]
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GetVoucherResponse {
    pub exists: bool,
    pub voucher: Option<Voucher>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateSeatRequest {
    pub flight_number: String,
    pub date: String,
    pub seat_position: SeatPosition,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateSeatResponse {
    pub success: bool,
    #[serde(default)]
    pub new_seat: String,
    #[serde(default)]
    pub all_seats: Vec<String>,
}

/// Error body returned by the voucher server on non-2xx responses.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
