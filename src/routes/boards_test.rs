use frames::{DrawableObject, Transform};

use super::*;
use crate::state::test_helpers;

#[tokio::test]
async fn unknown_board_is_not_found_and_not_created() {
    let state = test_helpers::test_app_state();

    let result = get_board(State(state.clone()), Path("nope".into())).await;

    assert_eq!(result.err(), Some(StatusCode::NOT_FOUND));
    assert!(!state.rooms.read().await.contains("nope"));
}

#[tokio::test]
async fn returns_objects_in_order() {
    let state = test_helpers::test_app_state();
    test_helpers::seed_board(
        &state,
        "b1",
        vec![
            DrawableObject::text("o1", "ب", Transform::at(100.0, 100.0)),
            DrawableObject::path("p1", vec![[0.0, 0.0], [1.0, 1.0]], Transform::default()),
        ],
    )
    .await;

    let Ok(Json(snapshot)) = get_board(State(state), Path("b1".into())).await else {
        panic!("expected snapshot");
    };

    let ids: Vec<_> = snapshot.objects.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, ["o1", "p1"]);
}
