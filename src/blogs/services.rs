use super::dto::UpdateBlogRequest;
use super::repo::Blog;

/// Apply a partial update to an existing blog, last-non-empty-wins.
///
/// A field is written only when the request carries a usable value: strings
/// when non-empty, `status` when present, `tags` when present (an empty
/// list is an explicit clear, absence keeps the old list). Draft autosaves
/// send only changed fields and rely on everything else surviving, so a
/// client can never blank a text field through this path. The slug never
/// changes here.
pub fn merge_blog_update(existing: &Blog, patch: UpdateBlogRequest) -> Blog {
    let mut merged = existing.clone();
    merged.title = keep_nonempty(patch.title, &existing.title);
    merged.excerpt = keep_nonempty(patch.excerpt, &existing.excerpt);
    merged.body = keep_nonempty(patch.body, &existing.body);
    merged.category = keep_nonempty(patch.category, &existing.category);
    if let Some(url) = nonempty(patch.featured_image_url) {
        merged.featured_image_url = Some(url);
    }
    if let Some(tags) = patch.tags {
        merged.tags = tags;
    }
    if let Some(status) = patch.status {
        merged.status = status;
    }
    merged
}

pub(crate) fn keep_nonempty(incoming: Option<String>, current: &str) -> String {
    match nonempty(incoming) {
        Some(v) => v,
        None => current.to_string(),
    }
}

pub(crate) fn nonempty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blogs::repo::BlogStatus;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn existing() -> Blog {
        Blog {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            title: "My First Post".into(),
            slug: "my-first-post".into(),
            excerpt: "Old excerpt".into(),
            body: "<p>Old body</p>".into(),
            featured_image_url: None,
            tags: vec!["rust".into()],
            category: "web-dev".into(),
            status: BlogStatus::Published,
            views: 3,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    fn empty_patch() -> UpdateBlogRequest {
        UpdateBlogRequest {
            title: None,
            excerpt: None,
            body: None,
            featured_image_url: None,
            tags: None,
            category: None,
            status: None,
        }
    }

    #[test]
    fn empty_string_is_skipped_nonempty_wins() {
        let blog = existing();
        let merged = merge_blog_update(
            &blog,
            UpdateBlogRequest {
                title: Some("".into()),
                excerpt: Some("New excerpt".into()),
                ..empty_patch()
            },
        );
        assert_eq!(merged.title, "My First Post");
        assert_eq!(merged.excerpt, "New excerpt");
        assert_eq!(merged.body, blog.body);
    }

    #[test]
    fn slug_is_never_rederived_on_title_edit() {
        let blog = existing();
        let merged = merge_blog_update(
            &blog,
            UpdateBlogRequest {
                title: Some("A Completely Different Title".into()),
                ..empty_patch()
            },
        );
        assert_eq!(merged.title, "A Completely Different Title");
        assert_eq!(merged.slug, "my-first-post");
    }

    #[test]
    fn absent_tags_kept_present_tags_written() {
        let blog = existing();
        let untouched = merge_blog_update(&blog, empty_patch());
        assert_eq!(untouched.tags, vec!["rust".to_string()]);

        let cleared = merge_blog_update(
            &blog,
            UpdateBlogRequest {
                tags: Some(vec![]),
                ..empty_patch()
            },
        );
        assert!(cleared.tags.is_empty());
    }

    #[test]
    fn status_flip_is_symmetric_and_same_status_is_noop() {
        let blog = existing();
        let drafted = merge_blog_update(
            &blog,
            UpdateBlogRequest {
                status: Some(BlogStatus::Draft),
                ..empty_patch()
            },
        );
        assert_eq!(drafted.status, BlogStatus::Draft);

        let republished = merge_blog_update(
            &drafted,
            UpdateBlogRequest {
                status: Some(BlogStatus::Published),
                ..empty_patch()
            },
        );
        assert_eq!(republished.status, BlogStatus::Published);

        let unchanged = merge_blog_update(
            &blog,
            UpdateBlogRequest {
                status: Some(BlogStatus::Published),
                ..empty_patch()
            },
        );
        assert_eq!(unchanged.status, blog.status);
        assert_eq!(unchanged.title, blog.title);
    }

    #[test]
    fn whitespace_only_counts_as_empty() {
        let blog = existing();
        let merged = merge_blog_update(
            &blog,
            UpdateBlogRequest {
                body: Some("   \n".into()),
                ..empty_patch()
            },
        );
        assert_eq!(merged.body, blog.body);
    }
}
