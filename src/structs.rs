extern crate chrono;

/// One service on the board, as seen from the observation point.
///
/// `actual_arrival` is set iff `is_running` is true.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainRecord {
    pub origin: String,
    pub destination: String,
    pub is_running: bool,
    pub scheduled_status: String,
    pub actual_arrival: Option<chrono::NaiveDateTime>,
}

impl TrainRecord {
    pub fn not_running(origin: String, destination: String, scheduled_status: String) -> TrainRecord {
        return TrainRecord{
            origin: origin,
            destination: destination,
            is_running: false,
            scheduled_status: scheduled_status,
            actual_arrival: None,
        };
    }

    pub fn running(origin: String, destination: String, scheduled_status: String, arrival: chrono::NaiveDateTime) -> TrainRecord {
        return TrainRecord{
            origin: origin,
            destination: destination,
            is_running: true,
            scheduled_status: scheduled_status,
            actual_arrival: Some(arrival),
        };
    }
}

/// What one poll decided to show.
#[derive(Debug, PartialEq)]
pub struct ProcessedData {
    pub countdown_minutes: Option<i64>,
    pub origin: String,
    pub destination: String,
    pub payload: String,
}

impl ProcessedData {
    pub fn empty() -> ProcessedData {
        return ProcessedData{
            countdown_minutes: None,
            origin: "".to_string(),
            destination: "".to_string(),
            payload: "".to_string(),
        };
    }
}
