use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "PORTAL_LISTEN_ADDR";
pub const SHORTEN_PREFIX_ENV: &str = "PORTAL_SHORTEN_PREFIX";
pub const STORAGE_BACKEND_ENV: &str = "PORTAL_STORAGE_BACKEND";
pub const POSTGRES_DSN_ENV: &str = "PORTAL_POSTGRES_DSN";
pub const RUN_MIGRATIONS_ENV: &str = "PORTAL_RUN_MIGRATIONS";
pub const CODEC_ENV: &str = "PORTAL_CODEC";
pub const CODEC_SALT_ENV: &str = "PORTAL_CODEC_SALT";
pub const LOG_JSON_ENV: &str = "PORTAL_LOG_JSON";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_SHORTEN_PREFIX: &str = "http://127.0.0.1:8080/url/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "postgres")]
    Postgres,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Postgres => write!(f, "postgres"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CodecArg {
    /// Hashids, compatible with previously issued links.
    #[value(name = "hashids")]
    Hashids,
    /// Multiply/XOR obfuscation rendered as base58.
    #[value(name = "obfuscated")]
    Obfuscated,
}

impl Display for CodecArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecArg::Hashids => write!(f, "hashids"),
            CodecArg::Obfuscated => write!(f, "obfuscated"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "portal-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Prepended verbatim to every issued short code.
    #[arg(long, env = SHORTEN_PREFIX_ENV, default_value = DEFAULT_SHORTEN_PREFIX)]
    pub shorten_prefix: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = POSTGRES_DSN_ENV, required_if_eq("storage", "postgres"))]
    pub postgres_dsn: Option<String>,

    /// Apply the bundled schema migrations before serving.
    #[arg(long, env = RUN_MIGRATIONS_ENV)]
    pub run_migrations: bool,

    #[arg(long, env = CODEC_ENV, value_enum, default_value_t = CodecArg::Hashids)]
    pub codec: CodecArg,

    /// Salt for the hashids codec. Changing it invalidates issued links.
    #[arg(long, env = CODEC_SALT_ENV)]
    pub codec_salt: Option<String>,

    #[arg(long, env = LOG_JSON_ENV)]
    pub log_json: bool,
}
