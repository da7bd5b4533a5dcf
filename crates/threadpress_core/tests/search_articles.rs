use rusqlite::Connection;
use threadpress_core::db::open_db_in_memory;
use threadpress_core::{
    build_predicate, Article, ArticleDraft, ArticleRepository, ArticleService, CommentDraft,
    CommentRepository, Predicate, ScopeDefaults, SearchCriteria, SearchForm, SearchService,
    SearchServiceError, SearchValidationError, SqliteArticleRepository, SqliteCommentRepository,
    SqliteTagRepository,
};

fn create_article(conn: &Connection, draft: ArticleDraft) -> Article {
    ArticleService::new(
        SqliteArticleRepository::try_new(conn).unwrap(),
        SqliteTagRepository::try_new(conn).unwrap(),
    )
    .create_article(&draft)
    .unwrap()
}

fn comment(conn: &Connection, article: &Article, author: &str, text: &str) {
    SqliteCommentRepository::try_new(conn)
        .unwrap()
        .create_comment(article.uuid, &CommentDraft::new(author, text))
        .unwrap();
}

fn search_service(conn: &Connection) -> SearchService<SqliteArticleRepository<'_>> {
    SearchService::new(
        SqliteArticleRepository::try_new(conn).unwrap(),
        ScopeDefaults::STANDARD,
    )
}

/// Article "Rust Basics" tagged `rust` with one comment by alice.
fn seed_rust_basics(conn: &Connection) -> Article {
    let article = create_article(
        conn,
        ArticleDraft::new("Rust Basics", "Ownership and borrowing.", "bob").with_tags("rust"),
    );
    comment(conn, &article, "alice", "great read");
    article
}

#[test]
fn title_and_tag_match_returns_article_once() {
    let conn = open_db_in_memory().unwrap();
    let article = seed_rust_basics(&conn);

    let criteria = SearchCriteria {
        text: "rust".to_string(),
        in_title: true,
        in_tags: true,
        ..SearchCriteria::default()
    };
    let hits = search_service(&conn).search(&criteria).unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].uuid, article.uuid);
}

#[test]
fn comment_author_match_returns_article_once() {
    let conn = open_db_in_memory().unwrap();
    let article = seed_rust_basics(&conn);

    let criteria = SearchCriteria {
        author: "alice".to_string(),
        in_comments: true,
        in_articles: false,
        ..SearchCriteria::default()
    };
    let hits = search_service(&conn).search(&criteria).unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].uuid, article.uuid);
}

#[test]
fn unmatched_text_across_all_text_scopes_returns_nothing() {
    let conn = open_db_in_memory().unwrap();
    seed_rust_basics(&conn);

    let criteria = SearchCriteria {
        text: "python".to_string(),
        in_title: true,
        in_text: true,
        in_tags: true,
        in_comment_text: true,
        ..SearchCriteria::default()
    };
    assert!(search_service(&conn).search(&criteria).unwrap().is_empty());
}

#[test]
fn two_matching_comments_yield_one_hit() {
    let conn = open_db_in_memory().unwrap();
    let article = create_article(&conn, ArticleDraft::new("Post", "Body", "bob"));
    comment(&conn, &article, "x", "nice work");
    comment(&conn, &article, "y", "really NICE");

    let criteria = SearchCriteria {
        text: "nice".to_string(),
        in_comment_text: true,
        ..SearchCriteria::default()
    };
    let hits = search_service(&conn).search(&criteria).unwrap();
    assert_eq!(hits.len(), 1);
}

#[test]
fn clause_free_predicate_matches_no_rows() {
    let conn = open_db_in_memory().unwrap();
    seed_rust_basics(&conn);
    create_article(&conn, ArticleDraft::new("Other", "Body", "carol"));

    let criteria = SearchCriteria::with_defaults(ScopeDefaults::WITH_COMMENTS);
    let predicate = build_predicate(&criteria);
    assert!(predicate.is_empty());

    let repo = SqliteArticleRepository::try_new(&conn).unwrap();
    assert!(repo.search_articles(&predicate).unwrap().is_empty());
    assert!(repo.search_articles(&Predicate::nothing()).unwrap().is_empty());
}

#[test]
fn tag_scope_is_exact_match_ignoring_case() {
    let conn = open_db_in_memory().unwrap();
    let exact = create_article(
        &conn,
        ArticleDraft::new("One", "Body", "bob").with_tags("Rust"),
    );
    create_article(
        &conn,
        ArticleDraft::new("Two", "Body", "bob").with_tags("rustacean"),
    );

    let criteria = SearchCriteria {
        text: "rUsT".to_string(),
        in_tags: true,
        ..SearchCriteria::default()
    };
    let hits = search_service(&conn).search(&criteria).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].uuid, exact.uuid);
}

#[test]
fn body_substring_and_article_author_are_case_insensitive() {
    let conn = open_db_in_memory().unwrap();
    let by_body = create_article(
        &conn,
        ArticleDraft::new("A", "Learning SQLite internals", "dave"),
    );
    let by_author = create_article(&conn, ArticleDraft::new("B", "Body", "Erin"));

    let service = search_service(&conn);
    let body_hits = service
        .search(&SearchCriteria {
            text: "sqlite".to_string(),
            in_text: true,
            ..SearchCriteria::default()
        })
        .unwrap();
    assert_eq!(body_hits.len(), 1);
    assert_eq!(body_hits[0].uuid, by_body.uuid);

    let author_hits = service
        .search(&SearchCriteria {
            author: "ERIN".to_string(),
            in_articles: true,
            ..SearchCriteria::default()
        })
        .unwrap();
    assert_eq!(author_hits.len(), 1);
    assert_eq!(author_hits[0].uuid, by_author.uuid);

    let partial_author = service
        .search(&SearchCriteria {
            author: "eri".to_string(),
            in_articles: true,
            ..SearchCriteria::default()
        })
        .unwrap();
    assert!(partial_author.is_empty());
}

#[test]
fn non_ascii_text_is_matched_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let article = create_article(&conn, ArticleDraft::new("Привет, мир", "Тело", "Иван"));

    let hits = search_service(&conn)
        .search(&SearchCriteria {
            text: "ПРИВЕТ".to_string(),
            in_title: true,
            ..SearchCriteria::default()
        })
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].uuid, article.uuid);
}

#[test]
fn text_and_author_clauses_are_combined_with_or() {
    let conn = open_db_in_memory().unwrap();
    let by_title = create_article(&conn, ArticleDraft::new("Rust tips", "Body", "zed"));
    let by_author = create_article(&conn, ArticleDraft::new("Gardening", "Body", "alice"));
    create_article(&conn, ArticleDraft::new("Cooking", "Body", "mallory"));

    let hits = search_service(&conn)
        .search(&SearchCriteria {
            text: "rust".to_string(),
            author: "alice".to_string(),
            in_title: true,
            in_articles: true,
            ..SearchCriteria::default()
        })
        .unwrap();
    let mut ids: Vec<_> = hits.iter().map(|article| article.uuid).collect();
    ids.sort();
    let mut expected = vec![by_title.uuid, by_author.uuid];
    expected.sort();
    assert_eq!(ids, expected);
}

#[test]
fn form_search_uses_configured_defaults() {
    let conn = open_db_in_memory().unwrap();
    let article = create_article(&conn, ArticleDraft::new("Post", "Body", "bob"));
    comment(&conn, &article, "alice", "hidden gem");

    let form = SearchForm::from_pairs([("text", "gem")]);

    let standard = search_service(&conn).search_form(&form).unwrap();
    assert!(standard.is_empty());

    let with_comments = SearchService::new(
        SqliteArticleRepository::try_new(&conn).unwrap(),
        ScopeDefaults::WITH_COMMENTS,
    );
    let hits = with_comments.search_form(&form).unwrap();
    assert_eq!(hits.len(), 1);
}

#[test]
fn invalid_requests_are_rejected_before_querying() {
    let conn = open_db_in_memory().unwrap();
    seed_rust_basics(&conn);
    let service = search_service(&conn);

    let err = service.search_form(&SearchForm::default()).unwrap_err();
    assert!(matches!(
        err,
        SearchServiceError::Invalid(SearchValidationError::NoSearchTarget)
    ));

    let err = service
        .search(&SearchCriteria {
            text: "foo".to_string(),
            ..SearchCriteria::default()
        })
        .unwrap_err();
    assert!(matches!(
        err,
        SearchServiceError::Invalid(SearchValidationError::NoTextScope)
    ));

    let form = SearchForm::from_pairs([
        ("author", "bob"),
        ("in_articles", "false"),
        ("in_comments", "false"),
    ]);
    let err = service.search_form(&form).unwrap_err();
    assert!(matches!(
        err,
        SearchServiceError::Invalid(SearchValidationError::NoAuthorScope)
    ));
}

#[test]
fn results_are_ordered_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let older = create_article(&conn, ArticleDraft::new("rust one", "Body", "a"));
    let newer = create_article(&conn, ArticleDraft::new("rust two", "Body", "a"));

    let hits = search_rust_titles(&conn);
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].uuid, newer.uuid);
    assert_eq!(hits[1].uuid, older.uuid);
}

#[test]
fn creation_time_outranks_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let postdated = create_article(&conn, ArticleDraft::new("rust one", "Body", "a"));
    let first = create_article(&conn, ArticleDraft::new("rust two", "Body", "a"));
    conn.execute(
        "UPDATE articles SET created_at = created_at + 60000 WHERE uuid = ?1;",
        [postdated.uuid.to_string()],
    )
    .unwrap();

    let hits = search_rust_titles(&conn);
    assert_eq!(hits[0].uuid, postdated.uuid);
    assert_eq!(hits[1].uuid, first.uuid);
}

fn search_rust_titles(conn: &Connection) -> Vec<Article> {
    search_service(conn)
        .search(&SearchCriteria {
            text: "rust".to_string(),
            in_title: true,
            ..SearchCriteria::default()
        })
        .unwrap()
}
