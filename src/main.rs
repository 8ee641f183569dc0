// Next train past Narroways Hill Junction, on a Display-O-Tron HAT.
//
// Enable SPI with sudo raspi-config before running on the Pi.
extern crate chrono;
extern crate chrono_tz;
extern crate flexi_logger;
extern crate getopts;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

mod config;
mod display;
mod dothat;
mod realtime;
mod result;
mod rtt;
mod sn3218;
mod structs;

use display::CharacterDisplay;

fn local_now() -> chrono::NaiveDateTime {
    return chrono::Utc::now().with_timezone(&chrono_tz::Europe::London).naive_local();
}

fn process_data(trains: &[structs::TrainRecord], now: &chrono::NaiveDateTime) -> structs::ProcessedData {
    let next = rtt::next_train(trains)
        .and_then(|train| train.actual_arrival.map(|arrival| (train, arrival)));

    match next {
        None => {
            return structs::ProcessedData{
                countdown_minutes: None,
                origin: "".to_string(),
                destination: "".to_string(),
                payload: display::render_lines(["No trains", "", ""]),
            };
        },
        Some((train, arrival)) => {
            let countdown = realtime::minutes_until(&arrival, now);
            return structs::ProcessedData{
                countdown_minutes: Some(countdown),
                origin: train.origin.clone(),
                destination: train.destination.clone(),
                payload: display::render(&countdown.to_string(), &train.origin, &train.destination),
            };
        },
    }
}

struct RttDash {
    display: Box<dyn CharacterDisplay>,
    config: config::Config,
}

impl RttDash {
    fn new(display: Box<dyn CharacterDisplay>, config: config::Config) -> result::RttDashResult<RttDash> {
        let mut rttdash = RttDash{
            display: display,
            config: config,
        };
        rttdash.display.set_contrast(rttdash.config.contrast)?;
        let [red, green, blue] = rttdash.config.backlight_rgb;
        rttdash.display.set_backlight(red, green, blue)?;
        return Ok(rttdash);
    }

    fn show(&mut self, lines: [&str; display::LINE_COUNT]) -> result::RttDashResult<()> {
        self.display.clear()?;
        return self.display.write(&display::render_lines(lines));
    }

    fn wait_for_connection(&mut self) -> result::RttDashResult<()> {
        self.show(["Connecting...", "", ""])?;

        while !rtt::test_rtt_connection() {
            self.show(["Trying to", "connect...", ""])?;
            std::thread::sleep(std::time::Duration::from_secs(self.config.connect_retry_secs));
        }

        info!("Connected to Realtime Trains");
        return Ok(());
    }

    fn one_iteration(&mut self, prev_processed_data: &structs::ProcessedData) -> result::RttDashResult<structs::ProcessedData> {
        let now = local_now();
        let trains = rtt::fetch_and_load_trains(&self.config.station, &now)?;
        let processed_data = process_data(&trains, &now);

        if prev_processed_data.payload != processed_data.payload {
            info!("Updating {:?} -> {:?} ({} -> {})",
                  prev_processed_data.countdown_minutes,
                  processed_data.countdown_minutes,
                  processed_data.origin,
                  processed_data.destination);
            self.display.clear()?;
            self.display.write(&processed_data.payload)?;
        } else {
            debug!("Display didn't change, not refreshing");
        }

        return Ok(processed_data);
    }
}

fn setup_logging(log_dir: &str) -> result::RttDashResult<flexi_logger::LoggerHandle> {
    let handle = flexi_logger::Logger::try_with_env_or_str("info")?
        .log_to_file(flexi_logger::FileSpec::default().directory(log_dir))
        .duplicate_to_stderr(flexi_logger::Duplicate::Info)
        .rotate(
            flexi_logger::Criterion::Size(1_000_000),
            flexi_logger::Naming::Numbers,
            flexi_logger::Cleanup::KeepLogFiles(5))
        .format(flexi_logger::detailed_format)
        .start()?;
    return Ok(handle);
}

fn run(matches: &getopts::Matches) -> result::RttDashResult<()> {
    let log_dir = matches.opt_str("log-dir").unwrap_or(".".to_string());
    let _logger = setup_logging(&log_dir)?;

    let config = match matches.opt_str("config") {
        Some(path) => config::config_from_file(&path)?,
        None => config::Config::default(),
    };

    let skip_display = matches.opt_present("skip-display");
    let one_shot = matches.opt_present("one-shot");

    info!("Running. skip-display={} one-shot={} config={:?}", skip_display, one_shot, config);

    let display: Box<dyn CharacterDisplay> = if skip_display {
        Box::new(display::ConsoleDisplay::stdout())
    } else {
        Box::new(dothat::Dothat::new()?)
    };

    let mut rttdash = RttDash::new(display, config)?;
    rttdash.wait_for_connection()?;

    let mut prev_processed_data = structs::ProcessedData::empty();
    loop {
        match rttdash.one_iteration(&prev_processed_data) {
            Err(err) => error!("{}", err),
            Ok(processed_data) => prev_processed_data = processed_data,
        }

        if one_shot {
            return Ok(());
        }

        std::thread::sleep(std::time::Duration::from_secs(rttdash.config.poll_interval_secs));
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut opts = getopts::Options::new();
    opts.optflag("d", "skip-display", "print to the console instead of the LCD");
    opts.optflag("o", "one-shot", "poll once and exit");
    opts.optopt("c", "config", "JSON config file", "FILENAME");
    opts.optopt("l", "log-dir", "Where to put log files", "DIR");
    opts.optflag("h", "help", "print this help");

    let matches = match opts.parse(&args[1..]) {
        Ok(matches) => matches,
        Err(err) => {
            eprintln!("{}\n{}", err, opts.usage(&format!("Usage: {} [options]", args[0])));
            std::process::exit(2);
        },
    };

    if matches.opt_present("help") {
        println!("{}", opts.usage(&format!("Usage: {} [options]", args[0])));
        return;
    }

    if let Err(err) = run(&matches) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
