use quill_application::query::Query;
use quill_macros::{dto, query};

#[dto]
struct CountView {
    total: u64,
}

#[dto]
struct Page<T> {
    items: Vec<T>,
}

#[query(dto = CountView)]
struct CountPosts {
    author: Option<String>,
}

#[query(dto = Page<CountView>, name = "ListCounts")]
struct ListCounts;

fn main() {
    assert_eq!(CountPosts::NAME, "CountPosts");
    assert_eq!(ListCounts::NAME, "ListCounts");

    fn assert_dto<D: quill_application::dto::Dto>() {}
    assert_dto::<<CountPosts as Query>::Dto>();
    assert_dto::<Page<CountView>>();

    let q = CountPosts { author: None };
    assert_eq!(q.clone(), q);
    let _ = CountView { total: 1 };
}
