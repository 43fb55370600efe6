use std::io::IsTerminal;
use std::path::Path;

use anyhow::{Context, Result};
use futures_util::StreamExt;
use openrpc_client::Subscription;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub fn print_json<T: Serialize>(output: T) -> Result<()> {
    let output = if std::io::stdout().is_terminal() {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }?;

    println!("{output}");
    Ok(())
}

/// Prints every item until the subscription ends.
pub async fn print_stream<T>(mut subscription: Subscription<T>) -> Result<()>
where
    T: DeserializeOwned + Serialize,
{
    while let Some(item) = subscription.next().await {
        print_json(item?)?;
    }
    Ok(())
}

/// Reads `value` as a path when it starts with `@`, otherwise uses it as is.
pub fn read_bytes(value: &str) -> Result<Vec<u8>> {
    match value.strip_prefix('@') {
        Some(path) => std::fs::read(path).with_context(|| format!("failed to read {path}")),
        None => Ok(value.as_bytes().to_vec()),
    }
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    openrpc_util::serde_helpers::load_json_from_file(path)
        .with_context(|| format!("failed to load {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_from_arg_or_file() {
        assert_eq!(read_bytes("hello").unwrap(), b"hello");
        assert!(read_bytes("").unwrap().is_empty());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        std::fs::write(&path, [0u8, 1, 2, 255]).unwrap();

        let arg = format!("@{}", path.display());
        assert_eq!(read_bytes(&arg).unwrap(), [0, 1, 2, 255]);

        let missing = format!("@{}", dir.path().join("missing").display());
        let err = read_bytes(&missing).unwrap_err();
        assert!(err.to_string().starts_with("failed to read"), "{err}");
    }
}
