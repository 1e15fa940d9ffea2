use study_sdk::{resolve_image_url, resolve_media_url, ChatImage};

#[test]
fn absolute_urls_pass_through() {
    assert_eq!(
        resolve_media_url("http://127.0.0.1:5140", "https://cdn.example/v.mp4"),
        "https://cdn.example/v.mp4"
    );
    assert_eq!(
        resolve_media_url("http://127.0.0.1:5140", "http://other.host/v.mp4"),
        "http://other.host/v.mp4"
    );
}

#[test]
fn relative_paths_join_with_exactly_one_slash() {
    assert_eq!(
        resolve_media_url("http://127.0.0.1:5140", "/videos/doc-1.mp4"),
        "http://127.0.0.1:5140/videos/doc-1.mp4"
    );
    assert_eq!(
        resolve_media_url("http://127.0.0.1:5140/", "/videos/doc-1.mp4"),
        "http://127.0.0.1:5140/videos/doc-1.mp4"
    );
    assert_eq!(
        resolve_media_url("http://127.0.0.1:5140", "videos/doc-1.mp4"),
        "http://127.0.0.1:5140/videos/doc-1.mp4"
    );
}

#[test]
fn empty_paths_resolve_to_nothing() {
    assert_eq!(resolve_media_url("http://127.0.0.1:5140", ""), "");
}

#[test]
fn image_urls_prefer_the_explicit_url() {
    let image = ChatImage {
        url: Some("https://cdn.example/page-1.png".to_string()),
        path: Some("/images/page-1.png".to_string()),
        ..Default::default()
    };
    assert_eq!(
        resolve_image_url("http://127.0.0.1:5140", &image),
        "https://cdn.example/page-1.png"
    );
}

#[test]
fn image_paths_are_used_when_the_url_is_empty() {
    let image = ChatImage {
        url: Some(String::new()),
        path: Some("/images/page-1.png".to_string()),
        ..Default::default()
    };
    assert_eq!(
        resolve_image_url("http://127.0.0.1:5140", &image),
        "http://127.0.0.1:5140/images/page-1.png"
    );
}

#[test]
fn images_without_a_source_resolve_to_nothing() {
    assert_eq!(
        resolve_image_url("http://127.0.0.1:5140", &ChatImage::default()),
        ""
    );
}
