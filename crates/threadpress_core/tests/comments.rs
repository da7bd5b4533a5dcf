use threadpress_core::db::open_db_in_memory;
use threadpress_core::{
    ArticleDraft, ArticleRepository, ArticleService, ArticleServiceError, CommentDraft,
    CommentService, RepoError, SiteConfig, SqliteArticleRepository, SqliteCommentRepository,
    SqliteTagRepository,
};

#[test]
fn add_comment_returns_stored_comment() {
    let conn = open_db_in_memory().unwrap();
    let articles = SqliteArticleRepository::try_new(&conn).unwrap();
    let article_id = articles
        .create_article(&ArticleDraft::new("T", "B", "a"))
        .unwrap();
    let service = CommentService::new(SqliteCommentRepository::try_new(&conn).unwrap());

    let comment = service
        .add_comment(article_id, &CommentDraft::new("alice", "great read"))
        .unwrap();
    assert_eq!(comment.article_id, article_id);
    assert_eq!(comment.author, "alice");
    assert_eq!(comment.text, "great read");
    assert!(comment.created_at > 0);
}

#[test]
fn add_comment_to_missing_article_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = CommentService::new(SqliteCommentRepository::try_new(&conn).unwrap());
    let missing = uuid::Uuid::new_v4();

    let err = service
        .add_comment(missing, &CommentDraft::new("alice", "hi"))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == missing));
}

#[test]
fn blank_comment_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let articles = SqliteArticleRepository::try_new(&conn).unwrap();
    let article_id = articles
        .create_article(&ArticleDraft::new("T", "B", "a"))
        .unwrap();
    let service = CommentService::new(SqliteCommentRepository::try_new(&conn).unwrap());

    let err = service
        .add_comment(article_id, &CommentDraft::new("alice", "   "))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(ref v) if v.field == "text"));
}

#[test]
fn comments_are_paged_newest_first_three_per_page() {
    let conn = open_db_in_memory().unwrap();
    let articles = SqliteArticleRepository::try_new(&conn).unwrap();
    let article_id = articles
        .create_article(&ArticleDraft::new("T", "B", "a"))
        .unwrap();
    let service = CommentService::new(SqliteCommentRepository::try_new(&conn).unwrap());

    for idx in 0..7 {
        service
            .add_comment(article_id, &CommentDraft::new("c", format!("comment {idx}")))
            .unwrap();
    }

    let first = service.list_comments(article_id, None).unwrap();
    assert_eq!(first.num_pages, 3);
    assert_eq!(first.items.len(), 3);
    assert_eq!(first.items[0].text, "comment 6");
    assert!(first.has_other_pages());

    let last = service.list_comments(article_id, Some("3")).unwrap();
    assert_eq!(last.items.len(), 1);
    assert_eq!(last.items[0].text, "comment 0");

    let fallback = service.list_comments(article_id, Some("abc")).unwrap();
    assert_eq!(fallback.number, 1);
}

#[test]
fn article_without_comments_has_single_empty_page() {
    let conn = open_db_in_memory().unwrap();
    let articles = SqliteArticleRepository::try_new(&conn).unwrap();
    let article_id = articles
        .create_article(&ArticleDraft::new("T", "B", "a"))
        .unwrap();
    let service = CommentService::new(SqliteCommentRepository::try_new(&conn).unwrap());

    let page = service.list_comments(article_id, None).unwrap();
    assert!(page.items.is_empty());
    assert!(!page.has_other_pages());
}

#[test]
fn comments_posted_back_to_back_stay_newest_first() {
    for _ in 0..20 {
        let conn = open_db_in_memory().unwrap();
        let articles = SqliteArticleRepository::try_new(&conn).unwrap();
        let article_id = articles
            .create_article(&ArticleDraft::new("T", "B", "a"))
            .unwrap();
        let service = CommentService::new(SqliteCommentRepository::try_new(&conn).unwrap());

        for idx in 0..3 {
            service
                .add_comment(article_id, &CommentDraft::new("c", format!("comment {idx}")))
                .unwrap();
        }

        let texts: Vec<_> = service
            .list_comments(article_id, None)
            .unwrap()
            .items
            .into_iter()
            .map(|comment| comment.text)
            .collect();
        assert_eq!(texts, vec!["comment 2", "comment 1", "comment 0"]);
    }
}

#[test]
fn detail_pages_comments_with_configured_size() {
    let conn = open_db_in_memory().unwrap();
    let config = SiteConfig::from_lookup(|key: &str| {
        (key == "THREADPRESS_COMMENTS_PER_PAGE").then(|| "2".to_string())
    })
    .unwrap();
    let articles = ArticleService::new(
        SqliteArticleRepository::try_new(&conn).unwrap(),
        SqliteTagRepository::try_new(&conn).unwrap(),
    );
    let comments = config.comment_service(SqliteCommentRepository::try_new(&conn).unwrap());

    let article = articles
        .create_article(&ArticleDraft::new("T", "B", "a").with_tags("rust"))
        .unwrap();
    for idx in 0..5 {
        comments
            .add_comment(article.uuid, &CommentDraft::new("c", format!("comment {idx}")))
            .unwrap();
    }

    let detail = articles.detail(&comments, article.uuid, None).unwrap();
    assert_eq!(detail.article, article);
    assert_eq!(detail.comments.num_pages, 3);
    assert_eq!(detail.comments.items.len(), 2);
    assert_eq!(detail.comments.items[0].text, "comment 4");

    let last = articles.detail(&comments, article.uuid, Some("-1")).unwrap();
    assert_eq!(last.comments.number, 3);
    assert_eq!(last.comments.items[0].text, "comment 0");
}

#[test]
fn detail_of_missing_article_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let articles = ArticleService::new(
        SqliteArticleRepository::try_new(&conn).unwrap(),
        SqliteTagRepository::try_new(&conn).unwrap(),
    );
    let comments = CommentService::new(SqliteCommentRepository::try_new(&conn).unwrap());
    let missing = uuid::Uuid::new_v4();

    let err = articles.detail(&comments, missing, None).unwrap_err();
    assert!(matches!(err, ArticleServiceError::ArticleNotFound(id) if id == missing));
}
