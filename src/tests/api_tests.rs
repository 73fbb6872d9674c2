#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use http_body_util::BodyExt; // for .collect()
    use serde_json::Value;
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::routes;
    use crate::state::AppState;

    fn setup_test_app() -> axum::Router {
        let state = AppState::new(crate::config::AppConfig::default());

        axum::Router::new()
            .route("/", get(routes::health::root))
            .route("/healthz", get(routes::health::healthz))
            .route("/metrics", get(routes::health::metrics))
            .route("/metrics/prometheus", get(routes::health::metrics_prometheus))
            .route("/version", get(routes::health::version))
            .route("/analyze", get(routes::analyze::analyze_directory))
            .route("/analyze/extensions", get(routes::analyze::get_available_extensions))
            .route("/analyze/files", get(routes::analyze::get_paginated_files))
            .route("/file-info", get(routes::files::get_file_info))
            .route("/stream", get(routes::files::stream_file))
            .with_state(state)
    }

    /// a.txt (100 bytes), b.txt (50 bytes), c.log (200 bytes)
    fn create_test_directory() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), vec![b'a'; 100]).unwrap();
        fs::write(temp_dir.path().join("b.txt"), vec![b'b'; 50]).unwrap();
        fs::write(temp_dir.path().join("c.log"), vec![b'c'; 200]).unwrap();
        temp_dir
    }

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let response =
            app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    #[tokio::test]
    async fn test_healthz_endpoint() {
        let app = setup_test_app();
        let response = app
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_welcome_and_version_endpoints() {
        let (status, body) = get_json(setup_test_app(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].as_str().unwrap().contains("DateiLupe"));

        let (status, body) = get_json(setup_test_app(), "/version").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "dateilupe");
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let (status, body) = get_json(setup_test_app(), "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("scans_completed").is_some());
        assert!(body.get("streams_served").is_some());
    }

    #[tokio::test]
    async fn test_analyze_rejects_invalid_directory() {
        let (status, body) =
            get_json(setup_test_app(), "/analyze?path=/definitely/not/a/real/dir").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
        assert_eq!(body["error"]["message"], "Invalid directory path");
    }

    #[tokio::test]
    async fn test_analyze_full_report() {
        let temp_dir = create_test_directory();
        let uri = format!("/analyze?path={}", temp_dir.path().display());
        let (status, body) = get_json(setup_test_app(), &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["file_count"], 3);
        assert_eq!(body["total_size"], 350);
        assert_eq!(body["extensions"][".txt"]["count"], 2);
        assert_eq!(body["extensions"][".txt"]["size"], 150);
        assert_eq!(body["extensions"][".log"]["count"], 1);
        assert_eq!(body["extensions"][".log"]["size"], 200);

        let largest: Vec<&str> = body["largest_files"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["name"].as_str().unwrap())
            .collect();
        assert_eq!(largest, vec!["c.log", "a.txt", "b.txt"]);
        assert_eq!(body["all_files"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_analyze_with_extension_filter() {
        let temp_dir = create_test_directory();
        let uri = format!("/analyze?path={}&extension=.txt", temp_dir.path().display());
        let (status, body) = get_json(setup_test_app(), &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["file_count"], 2);
        assert_eq!(body["total_size"], 150);
        let extensions = body["extensions"].as_object().unwrap();
        assert_eq!(extensions.len(), 1);
        assert!(extensions.contains_key(".txt"));
    }

    #[tokio::test]
    async fn test_empty_extension_parameter_means_no_filter() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), vec![b'a'; 100]).unwrap();
        fs::write(temp_dir.path().join("README"), vec![b'r'; 20]).unwrap();

        // A trailing `extension=` deserializes as Some(""), which must not be
        // confused with a filter for extensionless files.
        let uri = format!("/analyze?path={}&extension=", temp_dir.path().display());
        let (status, body) = get_json(setup_test_app(), &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["file_count"], 2);
        assert_eq!(body["total_size"], 120);

        let uri = format!("/analyze/files?path={}&extension=", temp_dir.path().display());
        let (status, body) = get_json(setup_test_app(), &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
    }

    #[tokio::test]
    async fn test_extensions_listing_sorted_by_count() {
        let temp_dir = create_test_directory();
        let uri = format!("/analyze/extensions?path={}", temp_dir.path().display());
        let (status, body) = get_json(setup_test_app(), &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_files"], 3);
        let extensions = body["extensions"].as_array().unwrap();
        assert_eq!(extensions[0]["extension"], ".txt");
        assert_eq!(extensions[0]["count"], 2);
        assert_eq!(extensions[1]["extension"], ".log");
        assert_eq!(extensions[1]["count"], 1);
        assert!(extensions[1]["size_human"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_paginated_files_scenario() {
        let temp_dir = create_test_directory();
        let uri = format!("/analyze/files?path={}&limit=2&offset=1", temp_dir.path().display());
        let (status, body) = get_json(setup_test_app(), &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 3);
        assert_eq!(body["limit"], 2);
        assert_eq!(body["offset"], 1);
        assert_eq!(body["has_next"], false);
        assert_eq!(body["has_previous"], true);
        let names: Vec<&str> = body["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[tokio::test]
    async fn test_pagination_bounds_are_validation_errors() {
        let temp_dir = create_test_directory();
        let base = temp_dir.path().display();

        for query in ["limit=0", "limit=101", "offset=-1"] {
            let uri = format!("/analyze/files?path={}&{}", base, query);
            let (status, body) = get_json(setup_test_app(), &uri).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "query {}", query);
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        }

        // Bounds are checked before the directory: 422 beats the domain 400
        let (status, _) =
            get_json(setup_test_app(), "/analyze/files?path=/nope&limit=0").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_file_info_returns_stream_urls() {
        let temp_dir = create_test_directory();
        let file = temp_dir.path().join("a.txt");
        let uri = format!("/file-info?file_path={}", file.display());
        let (status, body) = get_json(setup_test_app(), &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "a.txt");
        assert_eq!(body["extension"], ".txt");
        assert_eq!(body["size"], 100);
        assert_eq!(body["content_type"], "text/plain");
        assert_eq!(body["is_symlink"], false);
        let stream_url = body["stream_url"].as_str().unwrap();
        assert!(stream_url.starts_with("/stream?file_path="));
        let download_url = body["download_url"].as_str().unwrap();
        assert!(download_url.ends_with("&download=true"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_info_describes_a_symlink_not_its_target() {
        let temp_dir = create_test_directory();
        let link = temp_dir.path().join("link.txt");
        std::os::unix::fs::symlink(temp_dir.path().join("a.txt"), &link).unwrap();

        let uri = format!("/file-info?file_path={}", link.display());
        let (status, body) = get_json(setup_test_app(), &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "link.txt");
        assert_eq!(body["is_symlink"], true);
    }

    #[tokio::test]
    async fn test_file_info_rejects_directories_and_missing_files() {
        let temp_dir = create_test_directory();

        let uri = format!("/file-info?file_path={}", temp_dir.path().display());
        let (status, _) = get_json(setup_test_app(), &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let uri = format!("/file-info?file_path={}/missing.txt", temp_dir.path().display());
        let (status, body) = get_json(setup_test_app(), &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Invalid file path or file does not exist");
    }

    #[tokio::test]
    async fn test_stream_serves_content_with_headers() {
        let temp_dir = create_test_directory();
        let file = temp_dir.path().join("a.txt");
        let uri = format!("/stream?file_path={}", file.display());

        let response = setup_test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers["content-type"], "text/plain");
        assert_eq!(headers["content-length"], "100");
        assert_eq!(headers["accept-ranges"], "bytes");
        assert_eq!(headers["content-disposition"], "inline; filename=\"a.txt\"");

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(bytes.as_ref(), &[b'a'; 100][..]);
    }

    #[tokio::test]
    async fn test_stream_download_disposition() {
        let temp_dir = create_test_directory();
        let file = temp_dir.path().join("c.log");
        let uri = format!("/stream?file_path={}&download=true", file.display());

        let response = setup_test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-disposition"],
            "attachment; filename=\"c.log\""
        );
    }

    #[tokio::test]
    async fn test_stream_rejects_unsafe_paths() {
        let (status, body) =
            get_json(setup_test_app(), "/stream?file_path=/definitely/not/here.bin").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");

        let temp_dir = create_test_directory();
        let uri = format!("/stream?file_path={}", temp_dir.path().display());
        let (status, _) = get_json(setup_test_app(), &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
