// [apps/server/src/config.rs]
//! Command-line / environment configuration surface.

use clap::Parser;
use std::path::PathBuf;

/// Content-addressed blob store with a VICBF membership summary, served over TLS.
#[derive(Parser, Debug)]
#[command(author = "Raz Podesta <metaShark Tech>", version, about)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "DENUL_BIND", default_value = "127.0.0.1:5566")]
    pub bind: String,

    /// Path to the local blob map database file.
    #[arg(long, env = "DENUL_DB_PATH", default_value = "denul.db")]
    pub db_path: PathBuf,

    /// Path to the PEM-encoded TLS certificate chain.
    #[arg(long, env = "DENUL_TLS_CERT")]
    pub tls_cert: PathBuf,

    /// Path to the PEM-encoded TLS private key.
    #[arg(long, env = "DENUL_TLS_KEY")]
    pub tls_key: PathBuf,

    /// Number of hash positions per VICBF element.
    #[arg(long, env = "DENUL_VICBF_K", default_value_t = 3)]
    pub vicbf_k: usize,

    /// Ceiling of the per-position increment draw.
    #[arg(long, env = "DENUL_VICBF_L", default_value_t = 15)]
    pub vicbf_increment_ceiling: u8,

    /// Baseline slot count folded into the startup sizing formula; raise
    /// this and restart to rebuild a larger filter.
    #[arg(long, env = "DENUL_VICBF_MIN_SLOTS", default_value_t = 10_000)]
    pub vicbf_min_slots: usize,

    /// Maximum accepted wire message size, in bytes.
    #[arg(long, env = "DENUL_MAX_MESSAGE_BYTES", default_value_t = denul_wire::DEFAULT_MAX_MESSAGE_BYTES)]
    pub max_message_bytes: u32,
}
