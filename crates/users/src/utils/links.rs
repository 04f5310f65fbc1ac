//! HATEOAS link builders.

use uuid::Uuid;

use crate::types::Link;

fn base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

/// Links describing what can be done with a single user.
pub fn user_links(base_url: &str, user_id: Uuid) -> Vec<Link> {
    let href = format!("{}/users/{}", base(base_url), user_id);
    vec![
        Link::new("self", href.clone(), "GET"),
        Link::new("update", href.clone(), "PUT"),
        Link::new("delete", href, "DELETE"),
    ]
}

/// Navigation links for a `skip`/`limit` page over `total` users.
pub fn pagination_links(base_url: &str, skip: i64, limit: i64, total: i64) -> Vec<Link> {
    let limit = limit.max(1);
    let page = |offset: i64| format!("{}/users/?skip={}&limit={}", base(base_url), offset, limit);
    let last_offset = if total > 0 { ((total - 1) / limit) * limit } else { 0 };

    let mut links = vec![
        Link::new("self", page(skip), "GET"),
        Link::new("first", page(0), "GET"),
        Link::new("last", page(last_offset), "GET"),
    ];

    if skip + limit < total {
        links.push(Link::new("next", page(skip + limit), "GET"));
    }
    if skip > 0 {
        links.push(Link::new("prev", page((skip - limit).max(0)), "GET"));
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rels(links: &[Link]) -> Vec<&str> {
        links.iter().map(|link| link.rel.as_str()).collect()
    }

    #[test]
    fn user_links_cover_read_update_delete() {
        let id = Uuid::new_v4();
        let links = user_links("http://localhost:7070/", id);

        assert_eq!(rels(&links), vec!["self", "update", "delete"]);
        assert_eq!(links[0].href, format!("http://localhost:7070/users/{id}"));
        assert_eq!(links[1].method, "PUT");
        assert_eq!(links[2].method, "DELETE");
    }

    #[test]
    fn first_page_has_next_but_no_prev() {
        let links = pagination_links("http://api", 0, 10, 25);
        assert_eq!(rels(&links), vec!["self", "first", "last", "next"]);
        assert_eq!(links[2].href, "http://api/users/?skip=20&limit=10");
        assert_eq!(links[3].href, "http://api/users/?skip=10&limit=10");
    }

    #[test]
    fn middle_page_has_next_and_prev() {
        let links = pagination_links("http://api", 10, 10, 25);
        assert_eq!(rels(&links), vec!["self", "first", "last", "next", "prev"]);
        assert_eq!(links[4].href, "http://api/users/?skip=0&limit=10");
    }

    #[test]
    fn last_page_has_prev_only() {
        let links = pagination_links("http://api", 20, 10, 25);
        assert_eq!(rels(&links), vec!["self", "first", "last", "prev"]);
    }

    #[test]
    fn empty_collection_points_last_at_start() {
        let links = pagination_links("http://api", 0, 10, 0);
        assert_eq!(rels(&links), vec!["self", "first", "last"]);
        assert_eq!(links[2].href, "http://api/users/?skip=0&limit=10");
    }
}
