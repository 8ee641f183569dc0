// Realtime Trains "detailed" advanced search, e.g.
// http://www.realtimetrains.co.uk/search/advanced/STPLNAR/2017/12/12/1800-1759?stp=WVS&show=all&order=actual
//
// Each service is a <tr> with two <td class="location"> cells (origin, then
// destination, each holding a <span>) and a <td class="realtime"> cell with
// the actual/expected time at the searched location.
extern crate chrono;
extern crate reqwest;
extern crate scraper;

use crate::realtime;
use crate::result;
use crate::structs::TrainRecord;

pub const DEFAULT_STATION: &str = "STPLNAR";

const RTT_HOST: &str = "realtimetrains.co.uk";
const USER_AGENT: &str = "rttdash (Display-O-Tron departure board)";

#[derive(Debug, Clone, PartialEq)]
pub struct BoardRow {
    pub origin: String,
    pub destination: String,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowError {
    MissingStation { row: usize, found: usize },
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            RowError::MissingStation { row, found } => {
                return write!(f, "Row {} has {} of 2 station names", row, found);
            },
        }
    }
}

/// Search URL for the 24 hours starting at `start` (local time).
pub fn generate_rtt_url(station: &str, start: &chrono::NaiveDateTime) -> String {
    let end = *start + chrono::Duration::hours(23) + chrono::Duration::minutes(59);

    return format!(
        "http://www.{host}/search/advanced/{station}/{date}/{from}-{to}?stp=WVS&show=all&order=actual",
        host = RTT_HOST,
        station = station,
        date = start.format("%Y/%m/%d"),
        from = start.format("%H%M"),
        to = end.format("%H%M"));
}

fn selector(css: &str) -> result::RttDashResult<scraper::Selector> {
    return scraper::Selector::parse(css).map_err(|err| {
        result::make_error(&format!("Bad selector '{}': {:?}", css, err))
    });
}

fn element_text(element: &scraper::ElementRef) -> String {
    return element.text().collect::<String>().trim().to_string();
}

/// Pulls the service rows out of a board, in document order.
///
/// Rows without any location cell (headings, dividers) are not services and
/// are left out. A service row that lacks a station name comes back as an
/// `Err` in its slot so the caller can decide what to do with it.
pub fn parse_board(html: &str) -> result::RttDashResult<Vec<Result<BoardRow, RowError>>> {
    let document = scraper::Html::parse_document(html);

    let row_selector = selector("table tr")?;
    let location_selector = selector("td.location")?;
    let station_selector = selector("td.location > span")?;
    let realtime_selector = selector("td.realtime")?;

    let mut rows = vec![];
    for (index, row) in document.select(&row_selector).enumerate() {
        if row.select(&location_selector).next().is_none() {
            continue;
        }

        let stations: Vec<String> = row.select(&station_selector)
            .map(|span| element_text(&span))
            .filter(|name| !name.is_empty())
            .collect();

        if stations.len() < 2 {
            rows.push(Err(RowError::MissingStation{
                row: index,
                found: stations.len(),
            }));
            continue;
        }

        let status = row.select(&realtime_selector)
            .next()
            .map(|cell| element_text(&cell))
            .filter(|text| !text.is_empty());

        rows.push(Ok(BoardRow{
            origin: stations[0].clone(),
            destination: stations[1].clone(),
            status: status,
        }));
    }

    return Ok(rows);
}

fn to_record(row: BoardRow, accessed: &chrono::NaiveDateTime) -> TrainRecord {
    let raw_status = row.status.clone().unwrap_or("".to_string());

    match realtime::classify_status(row.status.as_ref().map(String::as_str)) {
        realtime::StatusToken::Time(clock_time) => {
            match clock_time.on_or_after(accessed) {
                Ok(arrival) => {
                    return TrainRecord::running(row.origin, row.destination, raw_status, arrival);
                },
                Err(err) => {
                    warn!("{} -> {}: unusable time '{}': {}",
                          row.origin, row.destination, raw_status, err);
                    return TrainRecord::not_running(row.origin, row.destination, raw_status);
                },
            }
        },
        realtime::StatusToken::Cancelled | realtime::StatusToken::Unrecognized => {
            return TrainRecord::not_running(row.origin, row.destination, raw_status);
        },
    }
}

/// Every service on the board, with arrival times resolved against
/// `accessed` (the moment the board was fetched).
pub fn load_trains(html: &str, accessed: &chrono::NaiveDateTime) -> result::RttDashResult<Vec<TrainRecord>> {
    let mut trains = vec![];
    for row in parse_board(html)? {
        match row {
            Ok(row) => trains.push(to_record(row, accessed)),
            Err(err) => warn!("Skipping board row: {}", err),
        }
    }

    debug!("Loaded {} trains", trains.len());
    return Ok(trains);
}

/// The running train due soonest. Ties go to the one listed first.
pub fn next_train(trains: &[TrainRecord]) -> Option<&TrainRecord> {
    return trains.iter()
        .filter(|train| train.is_running)
        .filter_map(|train| train.actual_arrival.map(|arrival| (arrival, train)))
        .min_by_key(|(arrival, _)| *arrival)
        .map(|(_, train)| train);
}

pub fn fetch_board(url: &str) -> result::RttDashResult<String> {
    debug!("Fetching {}", url);
    let client = reqwest::blocking::Client::new();
    let response = client.get(url)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send()?
        .error_for_status()?;
    return Ok(response.text()?);
}

pub fn fetch_and_load_trains(station: &str, now: &chrono::NaiveDateTime) -> result::RttDashResult<Vec<TrainRecord>> {
    return fetch_and_load_trains_ext(station, now, fetch_board);
}

fn fetch_and_load_trains_ext(station: &str, now: &chrono::NaiveDateTime, fetch_fn: fn(&str) -> result::RttDashResult<String>) -> result::RttDashResult<Vec<TrainRecord>> {
    let html = fetch_fn(&generate_rtt_url(station, now))?;
    return load_trains(&html, now);
}

/// True if the Realtime Trains site answers at all.
pub fn test_rtt_connection() -> bool {
    let client = match reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build() {
        Ok(client) => client,
        Err(err) => {
            error!("Couldn't build HTTP client: {}", err);
            return false;
        },
    };

    match client.head(&format!("http://{}/", RTT_HOST))
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send() {
        Ok(response) => {
            debug!("{} answered {}", RTT_HOST, response.status());
            return true;
        },
        Err(err) => {
            info!("Can't reach {}: {}", RTT_HOST, err);
            return false;
        },
    }
}

#[cfg(test)]
mod tests {
    extern crate chrono;

    use super::result;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> chrono::NaiveDateTime {
        return chrono::NaiveDate::from_ymd_opt(y, mo, d).unwrap()
            .and_hms_opt(h, mi, s).unwrap();
    }

    fn golden_board() -> String {
        return std::fs::read_to_string("testdata/rtt_detailed_list_of_trains.html")
            .expect("Error reading rtt_detailed_list_of_trains.html");
    }

    fn one_row_board(origin: &str, destination: &str, status: &str) -> String {
        return format!(
            "<html><body><table><tr>\
             <td class=\"location\"><span>{}</span></td>\
             <td class=\"location\"><span>{}</span></td>\
             <td class=\"realtime\">{}</td>\
             </tr></table></body></html>",
            origin, destination, status);
    }

    #[test]
    fn url_single_digits() {
        assert_eq!(
            "http://www.realtimetrains.co.uk/search/advanced/STPLNAR/2017/01/01/0000-2359?stp=WVS&show=all&order=actual",
            super::generate_rtt_url("STPLNAR", &at(2017, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn url_double_digits() {
        let url = super::generate_rtt_url("STPLNAR", &at(2017, 10, 10, 23, 59, 59));
        let components: Vec<&str> = url.split('/').collect();

        assert_eq!("10", components[7]);
        assert_eq!("10", components[8]);
        assert_eq!("2359-2358?stp=WVS&show=all&order=actual", components[9]);
    }

    #[test]
    fn url_leap_day() {
        let url = super::generate_rtt_url("STPLNAR", &at(2000, 2, 29, 12, 0, 0));
        assert!(url.contains("/STPLNAR/2000/02/29/1200-1159?"), "{}", url);
    }

    #[test]
    fn url_other_station() {
        let url = super::generate_rtt_url("BRSTLTM", &at(2099, 1, 1, 0, 0, 0));
        assert!(url.starts_with("http://www.realtimetrains.co.uk/search/advanced/BRSTLTM/2099/01/01/"), "{}", url);
    }

    #[test]
    fn parse_golden_board_rows() {
        let rows = super::parse_board(&golden_board()).expect("parse_board");

        assert_eq!(11, rows.len());
        assert!(rows.iter().all(|row| row.is_ok()));

        let first = rows[0].as_ref().unwrap();
        assert_eq!("Cardiff Central", first.origin);
        assert_eq!("Portsmouth Harbour", first.destination);
        assert_eq!(Some("1957½".to_string()), first.status);

        let fifth = rows[4].as_ref().unwrap();
        assert_eq!(None, fifth.status);
    }

    #[test]
    fn load_golden_board() {
        let trains = super::load_trains(&golden_board(), &at(2017, 12, 12, 18, 0, 0))
            .expect("load_trains");

        let expected: Vec<(&str, &str, Option<chrono::NaiveDateTime>)> = vec![
            ("Cardiff Central", "Portsmouth Harbour", Some(at(2017, 12, 12, 19, 57, 30))),
            ("Worcester Shrub Hill", "Bristol Temple Meads", Some(at(2017, 12, 12, 20, 8, 0))),
            ("Tunstead Sdgs", "Westbury Lafarge", None),
            ("Bristol Temple Meads", "Stoke Gifford", Some(at(2017, 12, 12, 20, 21, 0))),
            ("Edinburgh", "Bristol Temple Meads", None),
            ("Bristol Temple Meads", "Leeds", Some(at(2017, 12, 12, 20, 34, 0))),
            ("Bristol Temple Meads", "Cheltenham Spa", Some(at(2017, 12, 12, 20, 44, 0))),
            ("Portsmouth Harbour", "Cardiff Central", Some(at(2017, 12, 12, 20, 51, 0))),
            ("Cardiff Central", "Portsmouth Harbour", Some(at(2017, 12, 12, 21, 8, 0))),
            ("Edinburgh", "Bristol Temple Meads", Some(at(2017, 12, 12, 21, 37, 0))),
            ("Portsmouth Harbour", "Cardiff Central", Some(at(2017, 12, 12, 21, 49, 0))),
        ];

        assert_eq!(expected.len(), trains.len());
        for (train, (origin, destination, arrival)) in trains.iter().zip(expected.iter()) {
            assert_eq!(*origin, train.origin);
            assert_eq!(*destination, train.destination);
            assert_eq!(*arrival, train.actual_arrival);
            assert_eq!(arrival.is_some(), train.is_running);
        }

        assert_eq!("Cancel", trains[2].scheduled_status);
        assert_eq!("2008", trains[1].scheduled_status);
    }

    #[test]
    fn next_train_on_golden_board() {
        let trains = super::load_trains(&golden_board(), &at(2017, 12, 12, 18, 0, 0))
            .expect("load_trains");

        let next = super::next_train(&trains).expect("next_train");
        assert_eq!("Cardiff Central", next.origin);
        assert_eq!("Portsmouth Harbour", next.destination);
    }

    #[test]
    fn next_train_after_midnight_rollover() {
        // 20:00 onwards, so every earlier service on the board rolls to tomorrow.
        let trains = super::load_trains(&golden_board(), &at(2017, 12, 12, 20, 30, 0))
            .expect("load_trains");

        let next = super::next_train(&trains).expect("next_train");
        assert_eq!("Leeds", next.destination);
        assert_eq!(Some(at(2017, 12, 13, 19, 57, 30)), trains[0].actual_arrival);
    }

    #[test]
    fn cancelled_train() {
        let html = one_row_board("Tunstead Sdgs", "Westbury Lafarge", "Cancel");
        let trains = super::load_trains(&html, &at(2017, 12, 12, 18, 0, 0)).expect("load_trains");

        assert_eq!(1, trains.len());
        assert_eq!(false, trains[0].is_running);
        assert_eq!(None, trains[0].actual_arrival);
        assert_eq!(None, super::next_train(&trains));
    }

    #[test]
    fn unrecognized_and_impossible_times_are_not_running() {
        let now = at(2017, 12, 12, 18, 0, 0);

        for status in &["(Q)", "9999", "-"] {
            let html = one_row_board("Edinburgh", "Bristol Temple Meads", status);
            let trains = super::load_trains(&html, &now).expect("load_trains");

            assert_eq!(1, trains.len());
            assert_eq!(false, trains[0].is_running, "status {}", status);
            assert_eq!(None, trains[0].actual_arrival, "status {}", status);
            assert_eq!(*status, trains[0].scheduled_status);
        }
    }

    #[test]
    fn missing_station_is_a_row_error() {
        let html = "<table>\
            <tr><th>Origin</th><th>Destination</th><th>Actual</th></tr>\
            <tr><td class=\"location\"><span>Leeds</span></td><td class=\"realtime\">2034</td></tr>\
            <tr><td class=\"location\"><span>Bristol Temple Meads</span></td>\
                <td class=\"location\"><span>Leeds</span></td><td class=\"realtime\">2034</td></tr>\
            </table>";

        let rows = super::parse_board(html).expect("parse_board");
        assert_eq!(2, rows.len());
        assert_eq!(Err(super::RowError::MissingStation{row: 1, found: 1}), rows[0]);
        assert!(rows[1].is_ok());

        let trains = super::load_trains(html, &at(2017, 12, 12, 18, 0, 0)).expect("load_trains");
        assert_eq!(1, trains.len());
        assert_eq!("Bristol Temple Meads", trains[0].origin);
    }

    #[test]
    fn empty_board() {
        let trains = super::load_trains("<html><body><p>No services</p></body></html>",
                                        &at(2017, 12, 12, 18, 0, 0)).expect("load_trains");
        assert!(trains.is_empty());
        assert_eq!(None, super::next_train(&trains));
    }

    #[test]
    fn fetch_and_load_with_fake_fetcher() {
        let fake_fetch_fn = |url: &str| -> result::RttDashResult<String> {
            assert!(url.contains("/STPLNAR/2017/12/12/1800-1759?"), "{}", url);
            return Ok(std::fs::read_to_string("testdata/rtt_detailed_list_of_trains.html")
                      .expect("error reading rtt_detailed_list_of_trains.html"));
        };

        let trains = super::fetch_and_load_trains_ext(
            "STPLNAR", &at(2017, 12, 12, 18, 0, 0), fake_fetch_fn).expect("fetch_and_load_trains");

        assert_eq!(11, trains.len());
    }

    #[test]
    fn fetch_errors_propagate() {
        let failing_fetch_fn = |_: &str| -> result::RttDashResult<String> {
            return Err(result::make_error("offline"));
        };

        assert!(super::fetch_and_load_trains_ext(
            "STPLNAR", &at(2017, 12, 12, 18, 0, 0), failing_fetch_fn).is_err());
    }
}
