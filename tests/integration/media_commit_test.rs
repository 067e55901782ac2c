// Media library: upload cleanup, deletion and staged placement commits

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::atomic::Ordering;

use actix_web::{test, App};
use bytes::Bytes;
use helpers::*;
use salon_admin::modules::media::models::{MediaChangeSet, MediaItem, MediaPatch, MediaSection};
use salon_admin::modules::media::services::MediaUpload;
use salon_admin::modules::users::models::Role;
use serde_json::{json, Value};
use uuid::Uuid;

fn stored_item(name: &str) -> MediaItem {
    MediaItem {
        id: Uuid::new_v4(),
        name: name.to_string(),
        url: format!("https://storage.test/media/{}", name),
        mime_type: "image/png".to_string(),
        section: None,
        sort_order: 0,
        position: "center".to_string(),
        storage_path: Some(format!("owner/{}", name)),
        owner: Uuid::new_v4(),
        created_at: utc(2025, 1, 1, 12, 0, 0),
    }
}

fn patch(section: MediaSection, order: i32) -> MediaPatch {
    MediaPatch {
        section: Some(section),
        order,
        position: "top".to_string(),
    }
}

fn upload(owner: Uuid) -> MediaUpload {
    MediaUpload {
        owner,
        file_name: "portada salón.png".to_string(),
        content_type: "image/png".to_string(),
        body: Bytes::from_static(b"\x89PNG fake image"),
    }
}

#[actix_web::test]
async fn test_commit_applies_every_staged_change() {
    let backend = TestBackend::new();
    let hero = stored_item("hero.png");
    let promo = stored_item("promo.png");
    backend
        .media
        .items
        .lock()
        .unwrap()
        .extend([hero.clone(), promo.clone()]);
    let state = backend.state();

    let mut changes = MediaChangeSet::default();
    changes.stage(hero.id, patch(MediaSection::Inicio, 1));
    changes.stage(promo.id, patch(MediaSection::Ofertas, 2));

    let updated = state.media.commit(changes).await.expect("commit succeeds");
    assert_eq!(updated.len(), 2);

    let items = backend.media.snapshot();
    let hero_now = items.iter().find(|m| m.id == hero.id).unwrap();
    assert_eq!(hero_now.section.as_deref(), Some("inicio"));
    assert_eq!(hero_now.sort_order, 1);
    assert_eq!(hero_now.position, "top");
    assert_eq!(*backend.media.patch_batches.lock().unwrap(), 1);
}

#[actix_web::test]
async fn test_commit_with_missing_item_writes_nothing() {
    let backend = TestBackend::new();
    let hero = stored_item("hero.png");
    backend.media.items.lock().unwrap().push(hero.clone());
    let state = backend.state();

    let mut changes = MediaChangeSet::default();
    changes.stage(hero.id, patch(MediaSection::Nosotros, 3));
    changes.stage(Uuid::new_v4(), patch(MediaSection::Inicio, 0));

    let err = state.media.commit(changes).await.unwrap_err();
    assert!(err.to_string().contains("Media items"));

    assert_eq!(*backend.media.patch_batches.lock().unwrap(), 0);
    assert_eq!(backend.media.snapshot()[0].section, None);
}

#[actix_web::test]
async fn test_commit_rejects_invalid_patch_before_lookup() {
    let backend = TestBackend::new();
    let hero = stored_item("hero.png");
    backend.media.items.lock().unwrap().push(hero.clone());
    let state = backend.state();

    let mut changes = MediaChangeSet::default();
    changes.stage(
        hero.id,
        MediaPatch {
            section: None,
            order: -4,
            position: "center".to_string(),
        },
    );

    assert!(state.media.commit(changes).await.is_err());
    assert_eq!(*backend.media.patch_batches.lock().unwrap(), 0);
}

#[actix_web::test]
async fn test_empty_commit_is_a_no_op() {
    let backend = TestBackend::new();
    let state = backend.state();

    let updated = state.media.commit(MediaChangeSet::default()).await.unwrap();
    assert!(updated.is_empty());
    assert_eq!(*backend.media.patch_batches.lock().unwrap(), 0);
}

#[actix_web::test]
async fn test_upload_stores_object_and_row() {
    let backend = TestBackend::new();
    let state = backend.state();
    let owner = Uuid::new_v4();

    let item = state.media.upload(upload(owner)).await.expect("upload succeeds");

    let path = item.storage_path.clone().unwrap();
    assert!(path.starts_with(&format!("{}/", owner)));
    assert!(path.ends_with("_portada_sal_n.png"), "{path}");
    assert_eq!(item.url, format!("https://storage.test/media/{}", path));
    assert!(backend.storage.objects.lock().unwrap().contains_key(&path));
    assert_eq!(backend.media.snapshot().len(), 1);
}

#[actix_web::test]
async fn test_upload_removes_object_when_row_insert_fails() {
    let backend = TestBackend::new();
    backend.media.fail_insert.store(true, Ordering::SeqCst);
    let state = backend.state();

    assert!(state.media.upload(upload(Uuid::new_v4())).await.is_err());

    assert!(backend.storage.objects.lock().unwrap().is_empty());
    assert_eq!(backend.storage.removed.lock().unwrap().len(), 1);
    assert!(backend.media.snapshot().is_empty());
}

#[actix_web::test]
async fn test_upload_rejects_non_media_types() {
    let backend = TestBackend::new();
    let state = backend.state();
    let mut pdf = upload(Uuid::new_v4());
    pdf.content_type = "application/pdf".to_string();

    assert!(state.media.upload(pdf).await.is_err());
    assert!(backend.storage.objects.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn test_delete_removes_row_and_object() {
    let backend = TestBackend::new();
    let hero = stored_item("hero.png");
    backend.media.items.lock().unwrap().push(hero.clone());
    let state = backend.state();

    state.media.delete(hero.id).await.unwrap();

    assert!(backend.media.snapshot().is_empty());
    assert_eq!(
        *backend.storage.removed.lock().unwrap(),
        vec!["owner/hero.png".to_string()]
    );
    assert!(state.media.delete(hero.id).await.is_err());
}

#[actix_web::test]
async fn test_commit_endpoint_requires_admin() {
    let backend = TestBackend::new();
    let admin = staff("Marta", "Díaz", Role::Admin);
    let stylist = staff("Ana", "Ruiz", Role::Employee);
    let hero = stored_item("hero.png");
    backend
        .users
        .users
        .lock()
        .unwrap()
        .extend([admin.clone(), stylist.clone()]);
    backend.media.items.lock().unwrap().push(hero.clone());
    let app = test::init_service(App::new().configure(backend.routes())).await;

    let mut changes = serde_json::Map::new();
    changes.insert(
        hero.id.to_string(),
        json!({ "section": "nosotros", "order": 4 }),
    );
    let body = json!({ "changes": changes });

    let req = test::TestRequest::post()
        .uri("/api/media/commit")
        .insert_header(bearer(stylist.id))
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    let req = test::TestRequest::post()
        .uri("/api/media/commit")
        .insert_header(bearer(admin.id))
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let payload: Value = test::read_body_json(resp).await;
    assert_eq!(payload[0]["section"], "nosotros");
    assert_eq!(payload[0]["sortOrder"], 4);
    assert_eq!(payload[0]["position"], "center");
}
