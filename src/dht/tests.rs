//! DHT Module Tests
//!
//! Validates the process boundary to the external client programs.
//!
//! ## Test Scopes
//! - **Validation**: Key/value rules enforced before any spawn.
//! - **Runner**: Stdout capture, exit-code and timeout taxonomy, argv
//!   passing. These tests execute small shell-script stand-ins for the real
//!   client programs.
//! - **Handlers**: Status codes across the happy path, empty ring, and
//!   upstream failure.

#[cfg(test)]
mod tests {
    use crate::dht::handlers::{handle_get_value, handle_put_value};
    use crate::dht::runner::{DhtClient, DhtPrograms};
    use crate::dht::types::{validate_key, validate_value, MAX_ARG_BYTES};
    use crate::error::GatewayError;
    use crate::ring::store::RingStore;
    use axum::extract::{Extension, Path};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;

    // ============================================================
    // VALIDATION TESTS
    // ============================================================

    #[test]
    fn test_validate_key_accepts_plain_keys() {
        assert!(validate_key("8").is_ok());
        assert!(validate_key("user:42").is_ok());
        assert!(validate_key("clé-épicée").is_ok());
    }

    #[test]
    fn test_validate_key_rejects_empty() {
        match validate_key("") {
            Err(GatewayError::InvalidKey(reason)) => {
                assert!(reason.contains("empty"));
            }
            other => panic!("Expected InvalidKey, got: {other:?}"),
        }
    }

    #[test]
    fn test_validate_key_rejects_oversized() {
        let key = "x".repeat(MAX_ARG_BYTES + 1);
        assert!(matches!(
            validate_key(&key),
            Err(GatewayError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_validate_key_rejects_control_characters() {
        assert!(matches!(
            validate_key("bad\nkey"),
            Err(GatewayError::InvalidKey(_))
        ));
        assert!(matches!(
            validate_key("tab\tkey"),
            Err(GatewayError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_validate_value_allows_spaces_but_not_control_characters() {
        assert!(validate_value("hello world").is_ok());
        assert!(matches!(
            validate_value("split\nvalue"),
            Err(GatewayError::InvalidValue(_))
        ));
    }

    // ============================================================
    // RUNNER TESTS
    // ============================================================

    /// Write an executable shell script standing in for a client program.
    #[cfg(unix)]
    fn script_program(body: &str) -> tempfile::TempPath {
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "#!/bin/sh\n{}\n", body).unwrap();
        // Close the write handle before exec, but keep the path alive.
        let path = file.into_temp_path();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[cfg(unix)]
    fn client(get: PathBuf, put: PathBuf, timeout: Duration) -> DhtClient {
        DhtClient::new(DhtPrograms { get, put }, timeout)
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_get_relays_program_stdout() {
        let get = script_program("echo \"$1 $2\"");
        let put = script_program("exit 0");
        let client = client(get.to_path_buf(), put.to_path_buf(), Duration::from_secs(5));

        let value = client.get("0.0.0.0:8001", "mykey").await.unwrap();
        assert_eq!(value, "0.0.0.0:8001 mykey");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_put_passes_all_three_arguments() {
        let get = script_program("exit 0");
        let put = script_program("echo \"$1|$2|$3\"");
        let client = client(get.to_path_buf(), put.to_path_buf(), Duration::from_secs(5));

        let value = client.put("node", "key", "value").await.unwrap();
        assert_eq!(value, "node|key|value");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_trailing_newlines_are_trimmed() {
        let get = script_program("printf 'stored\\n\\n'");
        let put = script_program("exit 0");
        let client = client(get.to_path_buf(), put.to_path_buf(), Duration::from_secs(5));

        let value = client.get("node", "key").await.unwrap();
        assert_eq!(value, "stored");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_program_failed() {
        let get = script_program("echo 'no route to node' >&2; exit 3");
        let put = script_program("exit 0");
        let client = client(get.to_path_buf(), put.to_path_buf(), Duration::from_secs(5));

        match client.get("node", "key").await {
            Err(GatewayError::ProgramFailed {
                code, stderr, ..
            }) => {
                assert_eq!(code, Some(3));
                assert!(stderr.contains("no route to node"));
            }
            other => panic!("Expected ProgramFailed, got: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_slow_program() {
        let get = script_program("sleep 5");
        let put = script_program("exit 0");
        let client = client(
            get.to_path_buf(),
            put.to_path_buf(),
            Duration::from_millis(100),
        );

        assert!(matches!(
            client.get("node", "key").await,
            Err(GatewayError::Timeout { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let client = DhtClient::new(
            DhtPrograms {
                get: PathBuf::from("/nonexistent/dht-get"),
                put: PathBuf::from("/nonexistent/dht-put"),
            },
            Duration::from_secs(5),
        );

        assert!(matches!(
            client.get("node", "key").await,
            Err(GatewayError::Spawn { .. })
        ));
    }

    // ============================================================
    // HANDLER TESTS
    // ============================================================

    fn seed_db(rows: &[(&str, &str)]) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        let conn = rusqlite::Connection::open(file.path()).unwrap();
        conn.execute(
            "CREATE TABLE chord (self TEXT NOT NULL, successor TEXT NOT NULL)",
            [],
        )
        .unwrap();
        for (id, successor) in rows {
            conn.execute(
                "INSERT INTO chord(self, successor) VALUES(?1, ?2)",
                rusqlite::params![id, successor],
            )
            .unwrap();
        }
        file
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_handle_get_value_relays_value() {
        let db = seed_db(&[("0.0.0.0:8001", "0.0.0.0:8001")]);
        let store = Arc::new(RingStore::open(db.path()).unwrap());
        let get = script_program("echo \"$2\"");
        let put = script_program("exit 0");
        let dht = Arc::new(client(
            get.to_path_buf(),
            put.to_path_buf(),
            Duration::from_secs(5),
        ));

        let resp = handle_get_value(Extension(store), Extension(dht), Path("mykey".to_string()))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["value"], "mykey");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_handle_put_value_relays_value() {
        let db = seed_db(&[("0.0.0.0:8001", "0.0.0.0:8001")]);
        let store = Arc::new(RingStore::open(db.path()).unwrap());
        let get = script_program("exit 0");
        let put = script_program("echo \"$1\"");
        let dht = Arc::new(client(
            get.to_path_buf(),
            put.to_path_buf(),
            Duration::from_secs(5),
        ));

        let resp = handle_put_value(
            Extension(store),
            Extension(dht),
            Path(("mykey".to_string(), "myvalue".to_string())),
        )
        .await
        .into_response();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_handle_get_value_on_empty_ring_is_503() {
        let db = seed_db(&[]);
        let store = Arc::new(RingStore::open(db.path()).unwrap());
        let dht = Arc::new(DhtClient::new(
            DhtPrograms {
                get: PathBuf::from("/nonexistent/dht-get"),
                put: PathBuf::from("/nonexistent/dht-put"),
            },
            Duration::from_secs(5),
        ));

        let resp = handle_get_value(Extension(store), Extension(dht), Path("mykey".to_string()))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_handle_get_value_rejects_bad_key_before_spawning() {
        let db = seed_db(&[("a", "a")]);
        let store = Arc::new(RingStore::open(db.path()).unwrap());
        let dht = Arc::new(DhtClient::new(
            DhtPrograms {
                get: PathBuf::from("/nonexistent/dht-get"),
                put: PathBuf::from("/nonexistent/dht-put"),
            },
            Duration::from_secs(5),
        ));

        // A spawn would fail with 502; 400 proves validation ran first.
        let resp = handle_get_value(
            Extension(store),
            Extension(dht),
            Path("bad\nkey".to_string()),
        )
        .await
        .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_handle_put_value_upstream_failure_is_502() {
        let db = seed_db(&[("a", "a")]);
        let store = Arc::new(RingStore::open(db.path()).unwrap());
        let get = script_program("exit 0");
        let put = script_program("exit 1");
        let dht = Arc::new(client(
            get.to_path_buf(),
            put.to_path_buf(),
            Duration::from_secs(5),
        ));

        let resp = handle_put_value(
            Extension(store),
            Extension(dht),
            Path(("mykey".to_string(), "myvalue".to_string())),
        )
        .await
        .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
