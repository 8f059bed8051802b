use quill_application::command::Command;
use quill_macros::command;
use uuid::Uuid;

#[command]
struct PublishDraft {
    id: Uuid,
    slug: String,
}

#[command(name = "ArchivePost")]
#[derive(Default)]
struct ArchivePostV2 {
    id: Uuid,
}

fn assert_wire_format<C: Command>() {}

fn main() {
    assert_eq!(PublishDraft::NAME, "PublishDraft");
    assert_eq!(ArchivePostV2::NAME, "ArchivePost");
    assert_wire_format::<PublishDraft>();

    let cmd = PublishDraft {
        id: Uuid::nil(),
        slug: "hello".into(),
    };
    assert_eq!(cmd.clone(), cmd);
    assert!(format!("{cmd:?}").contains("hello"));
    let _ = ArchivePostV2::default();
}
