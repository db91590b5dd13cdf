// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use norm::Record;

/// Not a column type.
#[derive(Default)]
pub struct Session {
    pub token: Vec<String>,
}

#[derive(Record, Default)]
#[norm(table = "accounts")]
pub struct Account {
    #[norm = "account_id,pk"]
    pub id: i64,

    #[norm = "-"]
    pub session: Session,
}

fn main() {
    let fields = Account::fields();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].tag, Some("account_id,pk"));

    let account = Account::default();
    assert!(account.get("session").is_none());
    assert!(account.session.token.is_empty());
}
