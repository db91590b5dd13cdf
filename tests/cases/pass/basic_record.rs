// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use norm::{Record, Value};

#[derive(Record, Default)]
pub struct BlogPost {
    #[norm = ",pk"]
    pub id: i64,

    pub title: String,

    pub draft: bool,
}

fn main() {
    assert_eq!(BlogPost::TYPE_NAME, "BlogPost");
    assert_eq!(BlogPost::TABLE, None);
    assert_eq!(BlogPost::fields().len(), 3);

    let mut post = BlogPost::default();
    post.set("title", Value::Text("hello".into())).unwrap();
    assert_eq!(post.get("title"), Some(Value::Text("hello".into())));
    assert!(post.set("nope", Value::Null).is_err());
}
