//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use chrono::NaiveDate;

use breedline::phase::Phase;
use breedline::plan::{AnimalRef, Plan, PlanId};

/// A plan in PLANNING with every COMMITTED requirement met.
pub fn ready_to_commit(id: &str) -> Plan {
    let mut plan = Plan::new(PlanId::new(id)).with_name("Spring litter");
    plan.species = Some("dog".to_string());
    plan.breed = Some("Whippet".to_string());
    plan.dam = Some(AnimalRef {
        id: "dam-7".to_string(),
        name: Some("Juno".to_string()),
    });
    plan.sire = Some(AnimalRef {
        id: "sire-3".to_string(),
        name: None,
    });
    plan.locked_cycle = true;
    plan
}

/// A committed plan sitting at `phase`.
pub fn plan_at(id: &str, phase: Phase) -> Plan {
    ready_to_commit(id).at_phase(phase)
}

pub fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

/// A scratch plans directory driven through the `breedline` binary.
pub struct BreedlineCli {
    dir: tempfile::TempDir,
}

impl BreedlineCli {
    #[allow(clippy::missing_panics_doc)]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    pub fn plans_dir(&self) -> PathBuf {
        self.dir.path().join("plans")
    }

    pub fn events_file(&self) -> PathBuf {
        self.dir.path().join("events.jsonl")
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_breedline"));
        cmd.args(args)
            .env("BREEDLINE_PLANS_DIR", self.plans_dir())
            .env("BREEDLINE_EVENTS_FILE", self.events_file())
            .env("NO_COLOR", "1")
            .env_remove("BREEDLINE_LOG_LEVEL");
        cmd
    }

    /// Runs a command with stdin closed.
    #[allow(clippy::missing_panics_doc)]
    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .stdin(Stdio::null())
            .output()
            .expect("failed to run breedline")
    }

    /// Runs a command feeding `input` on stdin.
    #[allow(clippy::missing_panics_doc)]
    pub fn run_with_input(&self, args: &[&str], input: &str) -> Output {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to spawn breedline");
        child
            .stdin
            .take()
            .expect("stdin is piped")
            .write_all(input.as_bytes())
            .expect("failed to write stdin");
        child.wait_with_output().expect("failed to wait for breedline")
    }

    /// Writes a plan document straight into the plans directory.
    #[allow(clippy::missing_panics_doc)]
    pub fn seed(&self, plan: &Plan) {
        std::fs::create_dir_all(self.plans_dir()).expect("failed to create plans dir");
        let yaml = serde_yaml::to_string(plan).expect("plan serializes");
        std::fs::write(self.plans_dir().join(format!("{}.yaml", plan.id)), yaml)
            .expect("failed to write plan");
    }

    /// Reads a plan document back from the plans directory.
    #[allow(clippy::missing_panics_doc)]
    pub fn read(&self, id: &str) -> Plan {
        let text = std::fs::read_to_string(self.plans_dir().join(format!("{id}.yaml")))
            .expect("plan document exists");
        serde_yaml::from_str(&text).expect("plan document parses")
    }

    /// Parses the JSONL event stream.
    pub fn events(&self) -> Vec<serde_json::Value> {
        std::fs::read_to_string(self.events_file())
            .unwrap_or_default()
            .lines()
            .map(|l| serde_json::from_str(l).expect("event line is JSON"))
            .collect()
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
