//! small-town — a flu season in a synthetic town of a few thousand people.
//!
//! Reads an optional JSON config path from the command line (the embedded
//! default is used otherwise), seeds cases from an import-window CSV, and
//! writes `daily_counts.csv` and `infection_events.csv` to the output
//! directory.

mod town;

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{LevelFilter, info};
use log4rs::Config;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use serde::Deserialize;

use epi_core::{AgentId, Day, DiseaseId, Population, SimConfig};
use epi_disease::{ContactTransmission, Disease};
use epi_health::{AgeTable, CaseFatality, InfectiousModel, ParametricNaturalHistory, SymptomsModel};
use epi_output::{CsvWriter, OutputWriter, SimOutputObserver};
use epi_schedule::load_import_windows_reader;
use epi_sim::{DailyCounts, Epidemic, EpidemicConfig, InfectionEvent, SimBuilder, SimObserver};

use town::build_town;

// ── Constants ─────────────────────────────────────────────────────────────────

const LOG_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%SZ)} {h({l})} {t} - {m}{n}";
const FLU: DiseaseId = DiseaseId(0);

const DEFAULT_CONFIG: &str = r#"{
    "sim":        { "total_days": 120, "seed": 42 },
    "log_level":  "info",
    "output_dir": "output/small-town",
    "town":       { "households": 1200, "max_household_size": 5, "schools": 3, "workplaces": 40 },
    "flu": {
        "transmissibility":  0.35,
        "contacts_per_day":  4.0,
        "prob_symptoms":     0.67,
        "immunity_days":     180,
        "epidemic":          { "seeding": "exposed:0.8;infectious:0.2", "rr_lag": 5 }
    }
}"#;

// Ten attempts on day 0 anywhere, then a trickle near the town center.
const IMPORTS_CSV: &str = "\
sim_day_start,sim_day_end,num_seeding_attempts,disease_id,seeding_attempt_prob,min_num_successful,lat,lon,radius
0,0,10,0,1.0,5,,,
7,20,1,0,0.5,0,40.44,-79.99,2.0
";

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct DemoConfig {
    sim:        SimConfig,
    log_level:  String,
    output_dir: PathBuf,
    town:       TownConfig,
    flu:        FluConfig,
}

#[derive(Deserialize)]
pub struct TownConfig {
    pub households:         usize,
    pub max_household_size: usize,
    pub schools:            usize,
    pub workplaces:         usize,
}

#[derive(Deserialize)]
struct FluConfig {
    transmissibility: f64,
    contacts_per_day: f64,
    prob_symptoms:    f64,
    immunity_days:    i32,
    #[serde(default)]
    epidemic:         EpidemicConfig,
}

fn load_config() -> Result<DemoConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
        }
        None => Ok(serde_json::from_str(DEFAULT_CONFIG)?),
    }
}

fn init_logging(level: &str) -> Result<()> {
    let level = LevelFilter::from_str(level).with_context(|| format!("log level {level:?}"))?;
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}

// ── Disease ───────────────────────────────────────────────────────────────────

fn flu(cfg: &FluConfig) -> Disease {
    let mut history = ParametricNaturalHistory::new(
        SymptomsModel::Lognormal {
            incubation_median:     1.9,
            incubation_dispersion: 1.51,
            duration_median:       5.0,
            duration_dispersion:   1.5,
        },
        InfectiousModel::OffsetFromSymptomsStart { start: -1.0, end: 4.0 },
    );
    history.prob_symptoms = AgeTable::uniform(cfg.prob_symptoms);
    history.immunity_duration = Some(cfg.immunity_days);
    history.asymptomatic_infectivity = 0.5;
    history.case_fatality = Some(CaseFatality {
        min_symptoms: 0.0,
        prob_by_age:  AgeTable::from_bands(&[(65.0, 0.000_05), (f64::MAX, 0.001)]),
        prob_by_day:  Vec::new(),
    });

    Disease::new(FLU, "influenza", history)
        .with_transmissibility(cfg.transmissibility)
        .with_transmission(ContactTransmission::new(cfg.contacts_per_day))
}

// ── Observer wrapper ──────────────────────────────────────────────────────────

/// Writes output, logs weekly progress, and keeps the final counts.
struct ProgressObserver<W: OutputWriter> {
    inner:      SimOutputObserver<W>,
    exposures:  usize,
    deaths:     usize,
    last:       Option<DailyCounts>,
}

impl<W: OutputWriter> ProgressObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, exposures: 0, deaths: 0, last: None }
    }
}

impl<W: OutputWriter> SimObserver for ProgressObserver<W> {
    fn on_exposure(&mut self, event: &InfectionEvent) {
        self.exposures += 1;
        self.inner.on_exposure(event);
    }

    fn on_daily_counts(&mut self, counts: &DailyCounts, disease: DiseaseId) {
        if counts.day.0 % 7 == 0 {
            info!(
                "{} S={} E={} I={} R={} M={} RR={:.2}",
                counts.day,
                counts.susceptible,
                counts.exposed,
                counts.infectious,
                counts.removed,
                counts.immune,
                counts.reproduction,
            );
        }
        self.last = Some(*counts);
        self.inner.on_daily_counts(counts, disease);
    }

    fn on_day_end(&mut self, day: Day, deaths: &[AgentId]) {
        self.deaths += deaths.len();
        self.inner.on_day_end(day, deaths);
    }

    fn on_sim_end(&mut self, final_day: Day) {
        self.inner.on_sim_end(final_day);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cfg = load_config()?;
    init_logging(&cfg.log_level)?;

    // 1. Build the town.
    let (population, places) = build_town(&cfg.town, cfg.sim.seed)?;
    info!("town: {} households, {} people", cfg.town.households, population.agent_count());

    // 2. Import windows.
    let imports = load_import_windows_reader(Cursor::new(IMPORTS_CSV))?;
    info!("loaded {} import windows", imports.windows().len());

    // 3. Build sim.
    let epidemic = Epidemic::new(flu(&cfg.flu), cfg.flu.epidemic.clone()).with_imports(&imports);
    let mut sim = SimBuilder::new(cfg.sim.clone(), population, places)
        .epidemic(epidemic)
        .build()?;

    // 4. Set up output.
    std::fs::create_dir_all(&cfg.output_dir)?;
    let writer = CsvWriter::new(Path::new(&cfg.output_dir))?;
    let mut obs = ProgressObserver::new(SimOutputObserver::new(writer));

    // 5. Run.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 6. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  exposures       : {}", obs.exposures);
    println!("  deaths          : {}", obs.deaths);
    if let Some(last) = obs.last {
        println!("  attack rate     : {:.1} %", last.attack_rate());
        println!("  symptomatic AR  : {:.1} %", last.symptomatic_attack_rate());
        println!("  CFR (/100 000)  : {:.1}", last.case_fatality_rate());
    }
    println!("  output          : {}", cfg.output_dir.display());

    Ok(())
}
