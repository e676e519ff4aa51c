use std::fs;

use tempfile::tempdir;
use webwhisk_deploy::{teardown, PublishConfig, Publisher};
use webwhisk_platform::MemoryPlatform;

const INDEX: &str = r#"<!DOCTYPE html>
<html>
<head>
  <link rel="stylesheet" owww="true" href="style.css">
  <!-- <script owww="true" src="old.js"></script> -->
</head>
<body>
  <a owww="true" href="index.html">Home</a>
  <a href="https://example.com/page.html">Elsewhere</a>
  <script owww="true" src="script.js"></script>
</body>
</html>
"#;

#[tokio::test]
async fn publishes_and_tears_down_a_site() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("index.html"), INDEX).unwrap();
    fs::write(temp.path().join("style.css"), "body { margin: 0; }").unwrap();
    fs::write(temp.path().join("script.js"), "document.title = 'demo';").unwrap();
    fs::write(temp.path().join("notes.txt"), "not published").unwrap();

    let platform = MemoryPlatform::new().with_web_base("https://whisk.test/api/v1/experimental/web/");

    let report = Publisher::new(PublishConfig::new("demo", temp.path()))
        .publish(&platform)
        .await
        .unwrap();

    assert_eq!(report.site, "demo");
    assert_eq!(report.units, 3);
    assert_eq!(
        report.url,
        "https://whisk.test/api/v1/experimental/web/guest/demo/index.html.http"
    );
    assert!(report.url.ends_with("/demo/index.html.http"));

    let units = platform.units("demo").await.unwrap();
    let mut names: Vec<&str> = units.iter().map(|u| u.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["index.html", "script.js", "style.css"]);

    let index = units.iter().find(|u| u.name == "index.html").unwrap();
    let html = &index.response.body;
    assert!(html.contains(r#"href="style.css.http""#));
    assert!(html.contains(r#"src="script.js.http""#));
    assert!(html.contains(r#"href="index.html.http""#));
    assert!(html.contains(r#"<!-- <script owww="true" src="old.js"></script> -->"#));
    assert!(html.contains(r#"href="https://example.com/page.html""#));
    assert_eq!(index.response.headers.content_type, "text/html");

    let css = units.iter().find(|u| u.name == "style.css").unwrap();
    assert_eq!(css.response.body, "body { margin: 0; }");
    assert!(css.exec.code.starts_with("function main() {"));

    let removed = teardown(&platform, "demo").await.unwrap();
    assert_eq!(removed.removed.len(), 3);
    assert!(!platform.has_container("demo").await);
}

#[tokio::test]
async fn republishing_overwrites_in_place() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("index.html"), "<h1>v1</h1>").unwrap();

    let platform = MemoryPlatform::new();
    let publisher = Publisher::new(PublishConfig::new("demo", temp.path()));
    publisher.publish(&platform).await.unwrap();

    fs::write(temp.path().join("index.html"), "<h1>v2</h1>").unwrap();
    publisher.publish(&platform).await.unwrap();

    let units = platform.units("demo").await.unwrap();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].response.body, "<h1>v2</h1>");
}
