use chrono::{DateTime, Utc};
use quill_domain::domain_event::DomainEvent;
use quill_macros::domain_event;
use uuid::Uuid;

#[domain_event]
struct DraftSaved {
    id: Uuid,
    saved_at: DateTime<Utc>,
    body: String,
}

#[domain_event(name = "CommentWasAdded", id = post_id)]
struct CommentAdded {
    post_id: Uuid,
    text: String,
}

fn main() {
    assert_eq!(DraftSaved::NAME, "DraftSaved");
    assert_eq!(CommentAdded::NAME, "CommentWasAdded");

    let id = Uuid::new_v4();
    let ev = CommentAdded {
        post_id: id,
        text: "nice".into(),
    };
    assert_eq!(ev.aggregate_id(), id.to_string());

    let saved = DraftSaved {
        id,
        saved_at: Utc::now(),
        body: String::new(),
    };
    assert_eq!(saved.clone(), saved);
}
