
use std::sync::atomic::Ordering;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};
use test_utils::*;

#[actix_rt::test]
async fn upload_returns_the_stored_file_record() {
    let ctx = test_context();
    let app = spawn_app(&ctx).await;
    let token = register_and_login(&app, "alice", "alice@example.com", "pw123").await;

    let resp = upload_file(&app, &token, "image", "cat.png", "image/png", PNG_MAGIC).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["file"]["originalName"], json!("cat.png"));
    assert_eq!(body["file"]["mimetype"], json!("image/png"));
    assert_eq!(body["file"]["size"], json!(PNG_MAGIC.len()));

    let filename = body["file"]["filename"].as_str().unwrap();
    assert_ne!(filename, "cat.png");
    assert_eq!(
        body["file"]["path"],
        json!(format!("/uploads/{filename}"))
    );
    assert!(ctx.upload_dir.path().join(filename).is_file());
}

#[actix_rt::test]
async fn uploaded_images_are_listed_most_recent_first() {
    let ctx = test_context();
    let app = spawn_app(&ctx).await;
    let token = register_and_login(&app, "alice", "alice@example.com", "pw123").await;

    upload_file(&app, &token, "image", "first.png", "image/png", PNG_MAGIC).await;
    upload_file(&app, &token, "image", "second.png", "image/png", PNG_MAGIC).await;

    let req = test::TestRequest::get()
        .uri("/api/upload")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["count"], json!(2));
    assert_eq!(body["images"][0]["originalName"], json!("second.png"));
    assert_eq!(body["images"][1]["originalName"], json!("first.png"));
}

#[actix_rt::test]
async fn images_of_other_users_are_invisible() {
    let ctx = test_context();
    let app = spawn_app(&ctx).await;

    let alice = register_and_login(&app, "alice", "alice@example.com", "pw123").await;
    let bob = register_and_login(&app, "bob", "bob@example.com", "pw123").await;

    upload_file(&app, &alice, "image", "cat.png", "image/png", PNG_MAGIC).await;

    let req = test::TestRequest::get()
        .uri("/api/upload")
        .insert_header(bearer(&bob))
        .to_request();
    let resp = test::call_service(&app, req).await;

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["count"], json!(0));
}

#[actix_rt::test]
async fn zero_byte_upload_is_rejected_and_leaves_no_blob() {
    let ctx = test_context();
    let app = spawn_app(&ctx).await;
    let token = register_and_login(&app, "alice", "alice@example.com", "pw123").await;

    let resp = upload_file(&app, &token, "image", "empty.png", "image/png", b"").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("ERROR_EMPTY_FILE"));

    assert_eq!(
        std::fs::read_dir(ctx.upload_dir.path()).unwrap().count(),
        0
    );
    assert_eq!(ctx.images.images.lock().unwrap().len(), 0);
}

#[actix_rt::test]
async fn oversized_upload_is_rejected_as_too_large() {
    let ctx = test_context();
    let app = spawn_app(&ctx).await;
    let token = register_and_login(&app, "alice", "alice@example.com", "pw123").await;

    let mut data = PNG_MAGIC.to_vec();
    data.resize(11 * 1024 * 1024, 0);

    let resp = upload_file(&app, &token, "image", "huge.png", "image/png", &data).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("ERROR_FILE_TOO_LARGE"));
}

#[actix_rt::test]
async fn wrong_multipart_field_name_is_rejected() {
    let ctx = test_context();
    let app = spawn_app(&ctx).await;
    let token = register_and_login(&app, "alice", "alice@example.com", "pw123").await;

    let resp = upload_file(&app, &token, "images", "cat.png", "image/png", PNG_MAGIC).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("ERROR_WRONG_FIELD_NAME"));
}

#[actix_rt::test]
async fn two_files_in_one_request_are_rejected() {
    let ctx = test_context();
    let app = spawn_app(&ctx).await;
    let token = register_and_login(&app, "alice", "alice@example.com", "pw123").await;

    let payload = multipart_body(&[
        ("image", "one.png", "image/png", PNG_MAGIC),
        ("image", "two.png", "image/png", PNG_MAGIC),
    ]);
    let req = test::TestRequest::post()
        .uri("/api/upload")
        .insert_header(bearer(&token))
        .insert_header(multipart_content_type())
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("ERROR_TOO_MANY_FILES"));
}

#[actix_rt::test]
async fn request_without_a_file_is_rejected() {
    let ctx = test_context();
    let app = spawn_app(&ctx).await;
    let token = register_and_login(&app, "alice", "alice@example.com", "pw123").await;

    let req = test::TestRequest::post()
        .uri("/api/upload")
        .insert_header(bearer(&token))
        .insert_header(multipart_content_type())
        .set_payload(multipart_body(&[]))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("ERROR_NO_FILE"));
}

#[actix_rt::test]
async fn disallowed_mimetype_is_rejected() {
    let ctx = test_context();
    let app = spawn_app(&ctx).await;
    let token = register_and_login(&app, "alice", "alice@example.com", "pw123").await;

    let resp = upload_file(&app, &token, "image", "notes.txt", "text/plain", b"hello").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("ERROR_INVALID_FILE_TYPE"));
}

#[actix_rt::test]
async fn non_image_content_behind_an_image_declaration_is_rejected() {
    let ctx = test_context();
    let app = spawn_app(&ctx).await;
    let token = register_and_login(&app, "alice", "alice@example.com", "pw123").await;

    let resp = upload_file(
        &app,
        &token,
        "image",
        "fake.png",
        "image/png",
        b"MZ\x90\x00\x03\x00\x00\x00",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("ERROR_INVALID_FILE_TYPE"));
}

#[actix_rt::test]
async fn delete_removes_blob_and_metadata() {
    let ctx = test_context();
    let app = spawn_app(&ctx).await;
    let token = register_and_login(&app, "alice", "alice@example.com", "pw123").await;

    let resp = upload_file(&app, &token, "image", "cat.png", "image/png", PNG_MAGIC).await;
    let body: Value = test::read_body_json(resp).await;
    let filename = body["file"]["filename"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/upload/{filename}"))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert!(!ctx.upload_dir.path().join(&filename).exists());

    let req = test::TestRequest::get()
        .uri("/api/upload")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["count"], json!(0));
}

#[actix_rt::test]
async fn deleting_an_absent_file_is_not_found() {
    let ctx = test_context();
    let app = spawn_app(&ctx).await;
    let token = register_and_login(&app, "alice", "alice@example.com", "pw123").await;

    let req = test::TestRequest::delete()
        .uri("/api/upload/nope.png")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("ERROR_FILE_NOT_FOUND"));
}

#[actix_rt::test]
async fn image_count_tracks_uploads_and_deletes() {
    let ctx = test_context();
    let app = spawn_app(&ctx).await;
    let token = register_and_login(&app, "alice", "alice@example.com", "pw123").await;

    let resp = upload_file(&app, &token, "image", "one.png", "image/png", PNG_MAGIC).await;
    let body: Value = test::read_body_json(resp).await;
    let filename = body["file"]["filename"].as_str().unwrap().to_string();

    upload_file(&app, &token, "image", "two.png", "image/png", PNG_MAGIC).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/upload/{filename}"))
        .insert_header(bearer(&token))
        .to_request();
    test::call_service(&app, req).await;

    let login = login_user(&app, "alice@example.com", "pw123").await;
    assert_eq!(login["user"]["image_count"], json!(1));
}

#[actix_rt::test]
async fn failed_metadata_insert_cleans_up_the_blob() {
    let ctx = test_context();
    let app = spawn_app(&ctx).await;
    let token = register_and_login(&app, "alice", "alice@example.com", "pw123").await;

    ctx.images.fail_insert.store(true, Ordering::SeqCst);

    let resp = upload_file(&app, &token, "image", "cat.png", "image/png", PNG_MAGIC).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("ERROR_DB_INSERT"));

    assert_eq!(
        std::fs::read_dir(ctx.upload_dir.path()).unwrap().count(),
        0
    );
}

#[actix_rt::test]
async fn uploads_require_authentication() {
    let ctx = test_context();
    let app = spawn_app(&ctx).await;

    let req = test::TestRequest::post()
        .uri("/api/upload")
        .insert_header(multipart_content_type())
        .set_payload(multipart_body(&[(
            "image",
            "cat.png",
            "image/png",
            PNG_MAGIC,
        )]))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("ERROR_NO_TOKEN"));
}
