use std::path::Path;

use anyhow::Result;
use serde::de::Visitor;
use serde::{Deserialize, Deserializer};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

/// Per-target log levels, loaded from a JSON object like
/// `{"openrpc_client": "debug", "reqwest": "warn"}`.
#[derive(Debug, Clone, Default)]
pub struct LoggerTargets {
    directives: Vec<Directive>,
}

impl LoggerTargets {
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        crate::serde_helpers::load_json_from_file(path)
    }

    pub fn build_filter(&self) -> EnvFilter {
        let mut builder = EnvFilter::default();
        for item in &self.directives {
            builder = builder.add_directive(item.clone());
        }
        builder
    }
}

impl<'de> Deserialize<'de> for LoggerTargets {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LoggerVisitor;

        impl<'de> Visitor<'de> for LoggerVisitor {
            type Value = LoggerTargets;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of targets to levels")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut directives = Vec::new();

                while let Some((target, level)) = map.next_entry::<String, String>()? {
                    let directive = format!("{target}={level}")
                        .parse::<Directive>()
                        .map_err(serde::de::Error::custom)?;

                    directives.push(directive);
                }

                Ok(LoggerTargets { directives })
            }
        }

        deserializer.deserialize_map(LoggerVisitor)
    }
}

/// Logs to stderr so that command output on stdout stays machine readable.
///
/// Filter priority: `RUST_LOG`, then the targets file, then `default_filter`.
pub fn init_logger(targets: Option<&Path>, default_filter: &str) -> Result<()> {
    let filter = if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        EnvFilter::from_default_env()
    } else if let Some(path) = targets {
        LoggerTargets::load_from(path)?.build_filter()
    } else {
        EnvFilter::try_new(default_filter)?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to init logger: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_targets() {
        let targets: LoggerTargets =
            serde_json::from_str(r#"{"openrpc_client": "debug", "reqwest": "warn"}"#).unwrap();
        assert_eq!(targets.directives.len(), 2);

        let filter = targets.build_filter().to_string();
        assert!(filter.contains("openrpc_client=debug"), "{filter}");

        assert!(serde_json::from_str::<LoggerTargets>(r#"{"a": "loud"}"#).is_err());
    }
}
