use chatter_core::db::open_db_in_memory;
use chatter_core::{
    Filter, Message, MessageMapper, RepoError, Repository, SqliteMessageRepository,
    SqliteUserRepository, User, UserMapper,
};
use rusqlite::Connection;
use std::collections::HashSet;
use uuid::Uuid;

const ACTOR: i64 = 42;

fn seed_user(conn: &mut Connection) -> i64 {
    let mut repo = SqliteUserRepository::try_new(conn, UserMapper::default()).unwrap();
    let mut user = User::new("barbara@example.com", "Barbara", "Liskov");
    repo.create(&mut user, ACTOR).unwrap()
}

fn seed_messages(repo: &mut SqliteMessageRepository<'_>, user_id: i64) {
    let batch = vec![
        Message::new(user_id, 1, "alpha report"),
        Message::new(user_id, 1, "beta report"),
        Message::new(user_id, 2, "alpha summary"),
        Message::new(user_id, 3, "gamma digest"),
    ];
    repo.bulk_create(&batch, ACTOR).unwrap();
}

fn guids(messages: &[Message]) -> HashSet<Uuid> {
    messages.iter().map(|message| message.stamp.guid).collect()
}

#[test]
fn filtered_query_selects_the_same_set_as_in_memory_filtering() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&mut conn);
    let mut repo = SqliteMessageRepository::try_new(&mut conn, MessageMapper::default()).unwrap();
    seed_messages(&mut repo, user_id);
    let mut mixed_case = Message::new(user_id, 2, "Quarterly SUMMARY");
    repo.create(&mut mixed_case, ACTOR).unwrap();

    let filter = Filter::eq("channel_id", 1).or(Filter::contains("text", "summary"));
    let selected = repo.get_where(&filter).unwrap();

    // SQLite LIKE folds ASCII case, so the in-memory comparison must fold
    // case too for the sets to agree.
    let expected: HashSet<Uuid> = repo
        .get_all()
        .unwrap()
        .into_iter()
        .filter(|message| {
            message.channel_id == 1 || message.text.to_lowercase().contains("summary")
        })
        .map(|message| message.stamp.guid)
        .collect();

    assert_eq!(guids(&selected), expected);
    assert_eq!(selected.len(), 4);
    assert!(guids(&selected).contains(&mixed_case.stamp.guid));
}

#[test]
fn renamed_text_member_queries_the_body_column() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&mut conn);
    let mut repo = SqliteMessageRepository::try_new(&mut conn, MessageMapper::default()).unwrap();
    seed_messages(&mut repo, user_id);

    let by_contains = repo.get_where(&Filter::contains("text", "alpha")).unwrap();
    assert_eq!(by_contains.len(), 2);

    let by_eq = repo.get_where(&Filter::eq("text", "gamma digest")).unwrap();
    assert_eq!(by_eq.len(), 1);
    assert_eq!(by_eq[0].channel_id, 3);
}

#[test]
fn negation_and_inequality_operators_translate() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&mut conn);
    let mut repo = SqliteMessageRepository::try_new(&mut conn, MessageMapper::default()).unwrap();
    seed_messages(&mut repo, user_id);

    let not_channel_one = repo
        .get_where(&Filter::eq("channel_id", 1).not())
        .unwrap();
    assert_eq!(not_channel_one.len(), 2);
    assert!(not_channel_one
        .iter()
        .all(|message| message.channel_id != 1));

    let later_channels = repo.get_where(&Filter::ge("channel_id", 2)).unwrap();
    assert_eq!(later_channels.len(), 2);
}

#[test]
fn stamp_members_are_queryable_through_the_domain_names() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&mut conn);
    let mut repo = SqliteMessageRepository::try_new(&mut conn, MessageMapper::default()).unwrap();

    let mut message = Message::new(user_id, 1, "stamped row");
    repo.create(&mut message, ACTOR).unwrap();

    let by_guid = repo
        .get_where(&Filter::eq("guid", message.stamp.guid))
        .unwrap();
    assert_eq!(by_guid.len(), 1);

    let by_actor = repo.get_where(&Filter::eq("created_by", ACTOR)).unwrap();
    assert_eq!(by_actor.len(), 1);

    let active = repo.get_where(&Filter::eq("is_active", true)).unwrap();
    assert_eq!(active.len(), 1);
}

#[test]
fn unmapped_member_fails_with_a_translation_error() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&mut conn);
    let mut repo = SqliteMessageRepository::try_new(&mut conn, MessageMapper::default()).unwrap();
    seed_messages(&mut repo, user_id);

    let err = repo
        .get_where(&Filter::eq("no_such_member", 1))
        .unwrap_err();
    match err {
        RepoError::Translation(inner) => assert_eq!(inner.member, "no_such_member"),
        other => panic!("expected translation error, got {other}"),
    }

    // The same contract holds for counting and first-row reads.
    assert!(matches!(
        repo.count_where(&Filter::eq("ghost", 1)),
        Err(RepoError::Translation(_))
    ));
    assert!(matches!(
        repo.first_where(&Filter::contains("ghost", "x")),
        Err(RepoError::Translation(_))
    ));
}

#[test]
fn repository_rejects_a_mapper_with_a_non_identifier_column() {
    use chatter_core::repo::message_repo::MessageEntity;
    use chatter_core::{EntityMapper, FieldMap, SqliteRepository};

    struct BrokenMapper {
        fields: FieldMap,
    }

    impl EntityMapper for BrokenMapper {
        type Model = Message;
        type Entity = MessageEntity;

        fn to_entity(&self, model: &Message) -> MessageEntity {
            MessageMapper::default().to_entity(model)
        }

        fn to_domain(&self, entity: &MessageEntity) -> Message {
            MessageMapper::default().to_domain(entity)
        }

        fn field_map(&self) -> &FieldMap {
            &self.fields
        }
    }

    let mapper = BrokenMapper {
        fields: FieldMap::identity(&["channel_id"]).rename("text", "body; DROP TABLE messages"),
    };

    let mut conn = open_db_in_memory().unwrap();
    let result = SqliteRepository::try_new(&mut conn, mapper);
    match result {
        Err(RepoError::InvalidFieldMap(err)) => {
            assert_eq!(err.member, "text");
            assert_eq!(err.column, "body; DROP TABLE messages");
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected field map rejection"),
    }
}
