use chatter_core::db::open_db_in_memory;
use chatter_core::{
    Message, MessageMapper, MessageRepository, MessageSearchParams, MessageService, Repository,
    SqliteMessageRepository, SqliteUserRepository, User, UserMapper,
};
use rusqlite::Connection;

const ACTOR: i64 = 42;

fn seed_user(conn: &mut Connection) -> i64 {
    let mut repo = SqliteUserRepository::try_new(conn, UserMapper::default()).unwrap();
    let mut user = User::new("linus@example.com", "Linus", "Torvalds");
    repo.create(&mut user, ACTOR).unwrap()
}

fn seed_messages(repo: &mut SqliteMessageRepository<'_>, user_id: i64) {
    let batch = vec![
        Message::new(user_id, 1, "Message One"),
        Message::new(user_id, 1, "Message Two"),
        Message::new(user_id, 2, "Message Three"),
    ];
    repo.bulk_create(&batch, ACTOR).unwrap();
}

#[test]
fn no_parameters_returns_the_full_set() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&mut conn);
    let mut repo = SqliteMessageRepository::try_new(&mut conn, MessageMapper::default()).unwrap();
    seed_messages(&mut repo, user_id);

    let mut params = MessageSearchParams::default();
    let found = repo.search_messages(&mut params).unwrap();
    assert_eq!(found.len(), 3);
}

#[test]
fn channel_filter_narrows_to_that_channel() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&mut conn);
    let mut repo = SqliteMessageRepository::try_new(&mut conn, MessageMapper::default()).unwrap();
    seed_messages(&mut repo, user_id);

    let mut params = MessageSearchParams {
        channel_id: Some(1),
        ..MessageSearchParams::default()
    };
    let found = repo.search_messages(&mut params).unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|message| message.channel_id == 1));
}

#[test]
fn unknown_channel_yields_empty_not_error() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&mut conn);
    let mut repo = SqliteMessageRepository::try_new(&mut conn, MessageMapper::default()).unwrap();
    seed_messages(&mut repo, user_id);

    let mut params = MessageSearchParams {
        channel_id: Some(3),
        ..MessageSearchParams::default()
    };
    let found = repo.search_messages(&mut params).unwrap();
    assert!(found.is_empty());
}

#[test]
fn text_search_is_case_insensitive() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&mut conn);
    let mut repo = SqliteMessageRepository::try_new(&mut conn, MessageMapper::default()).unwrap();
    seed_messages(&mut repo, user_id);

    for query in ["Two", "two", "TWO"] {
        let mut params = MessageSearchParams {
            search_query: Some(query.to_string()),
            ..MessageSearchParams::default()
        };
        let found = repo.search_messages(&mut params).unwrap();
        assert_eq!(found.len(), 1, "query `{query}` should match one message");
        assert_eq!(found[0].text, "Message Two");
    }
}

#[test]
fn search_lowercases_parameters_in_place() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&mut conn);
    let mut repo = SqliteMessageRepository::try_new(&mut conn, MessageMapper::default()).unwrap();
    seed_messages(&mut repo, user_id);

    let mut params = MessageSearchParams {
        search_query: Some("TWO".to_string()),
        ..MessageSearchParams::default()
    };
    repo.search_messages(&mut params).unwrap();
    assert_eq!(params.search_query.as_deref(), Some("two"));
}

#[test]
fn blank_search_query_is_ignored() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&mut conn);
    let mut repo = SqliteMessageRepository::try_new(&mut conn, MessageMapper::default()).unwrap();
    seed_messages(&mut repo, user_id);

    let mut params = MessageSearchParams {
        search_query: Some("   ".to_string()),
        ..MessageSearchParams::default()
    };
    let found = repo.search_messages(&mut params).unwrap();
    assert_eq!(found.len(), 3);
}

#[test]
fn combined_parameters_narrow_monotonically() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&mut conn);
    let mut repo = SqliteMessageRepository::try_new(&mut conn, MessageMapper::default()).unwrap();
    seed_messages(&mut repo, user_id);

    let mut both = MessageSearchParams {
        channel_id: Some(1),
        search_query: Some("two".to_string()),
    };
    let found = repo.search_messages(&mut both).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].text, "Message Two");

    // A query matching channel 2 text combined with channel 1 finds nothing.
    let mut conflicting = MessageSearchParams {
        channel_id: Some(1),
        search_query: Some("three".to_string()),
    };
    assert!(repo.search_messages(&mut conflicting).unwrap().is_empty());
}

#[test]
fn like_wildcards_in_the_query_are_matched_literally() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&mut conn);
    let mut repo = SqliteMessageRepository::try_new(&mut conn, MessageMapper::default()).unwrap();

    let batch = vec![
        Message::new(user_id, 1, "discount 100%"),
        Message::new(user_id, 1, "discount 100x"),
    ];
    repo.bulk_create(&batch, ACTOR).unwrap();

    let mut params = MessageSearchParams {
        search_query: Some("100%".to_string()),
        ..MessageSearchParams::default()
    };
    let found = repo.search_messages(&mut params).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].text, "discount 100%");
}

#[test]
fn service_exposes_the_search_pipeline() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&mut conn);
    let mut repo = SqliteMessageRepository::try_new(&mut conn, MessageMapper::default()).unwrap();
    seed_messages(&mut repo, user_id);

    let service = MessageService::new(repo);
    let mut params = MessageSearchParams {
        channel_id: Some(2),
        ..MessageSearchParams::default()
    };
    let found = service.get_messages(&mut params).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].text, "Message Three");
}
