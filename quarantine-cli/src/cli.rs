use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "quarantine-cli", version, about = "Quarantine and isolation policy engine")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Parser, Debug)]
pub struct GlobalFlags {
    /// Directory for daily-rolling log files. If unset, logs go to stderr only.
    #[arg(long, global = true)]
    pub log_dir: Option<String>,

    /// Path to a SQLite file backing the quarantine store. In-memory if unset.
    #[arg(long, global = true)]
    pub store: Option<String>,

    /// Emit machine-readable JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate auto-quarantine triggers against a workload fact bundle.
    Classify(ClassifyArgs),
    /// Open a quarantine record for a workload.
    Quarantine(QuarantineArgs),
    /// Release a quarantined workload.
    Release(ReleaseArgs),
    /// Run an examination pass over a quarantined workload.
    Examine(ExamineArgs),
    /// List quarantine records, optionally filtered.
    List(ListArgs),
    /// Resolve and print a syscall-filter profile.
    Profile(ProfileArgs),
}

#[derive(Parser, Debug)]
pub struct ClassifyArgs {
    pub id: String,
    #[arg(long, default_value = "blaze")]
    pub template: String,
    #[arg(long, default_value_t = 0.0)]
    pub cpu: f64,
    #[arg(long, default_value_t = 0.0)]
    pub mem: f64,
    #[arg(long, value_parser = parse_key_val)]
    pub metadata: Vec<(String, String)>,
    #[arg(long)]
    pub network_egress: Option<f64>,
    #[arg(long)]
    pub network_ingress: Option<f64>,
}

#[derive(Parser, Debug)]
pub struct QuarantineArgs {
    pub id: String,
    #[arg(long, value_enum)]
    pub reason: ReasonArg,
    #[arg(long)]
    pub requester: String,
    #[arg(long)]
    pub auto: bool,
    /// Human-readable description for one evidence entry; repeatable.
    #[arg(long = "evidence")]
    pub evidence: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct ReleaseArgs {
    pub id: String,
    #[arg(long)]
    pub approved_by: String,
    #[arg(long)]
    pub reason: String,
    #[arg(long)]
    pub network_mode: Option<String>,
    #[arg(long)]
    pub allowed_egress: Vec<String>,
    #[arg(long)]
    pub network_justification: Option<String>,
    #[arg(long)]
    pub seccomp_profile: Option<String>,
    #[arg(long)]
    pub security_justification: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ExamineArgs {
    pub id: String,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    #[arg(long)]
    pub id: Option<String>,
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,
}

#[derive(Parser, Debug)]
pub struct ProfileArgs {
    pub name: String,
    #[arg(long, value_enum, default_value_t = DialectArg::VmmNative)]
    pub dialect: DialectArg,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum ReasonArg {
    SuspiciousBehavior,
    PolicyViolation,
    NetworkAnomaly,
    ResourceAbuse,
    UntrustedSource,
    ManualFlag,
    SecurityScan,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum StatusArg {
    Active,
    Examining,
    Released,
    Destroyed,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum DialectArg {
    VmmNative,
    Generator,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (k, v) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    Ok((k.to_string(), v.to_string()))
}
