// Tests for author resolution over realistic feed markup

use byline_scanner::{AuthorResolver, MatchSource, PostBoundary, ResolveError, resolve_author};
use scraper::{ElementRef, Html, Selector};

fn parse(markup: &str) -> Html {
    Html::parse_fragment(markup)
}

fn time_element(html: &Html) -> ElementRef<'_> {
    let selector = Selector::parse("time").unwrap();
    html.select(&selector).next().expect("markup has a <time> element")
}

fn threads_resolver() -> AuthorResolver {
    AuthorResolver::new().with_boundary(PostBoundary::threads())
}

fn author_of(markup: &str) -> Option<String> {
    let html = parse(markup);
    threads_resolver()
        .resolve_author(time_element(&html))
        .unwrap()
        .username
}

// ============================================================================
// Normal posts
// ============================================================================

#[test]
fn test_simple_post() {
    let author = author_of(
        r#"<div data-pressable-container="true">
             <a href="/@alice">alice</a>
             <a href="/@alice/post/123">
               <time datetime="2025-12-20T10:00:00Z">10 hours ago</time>
             </a>
           </div>"#,
    );
    assert_eq!(author.as_deref(), Some("alice"));
}

#[test]
fn test_profile_link_with_query() {
    let author = author_of(
        r#"<div data-pressable-container="true">
             <a href="/@bob?ref=timeline">bob</a>
             <a href="/@bob/post/456"><time>5 hours ago</time></a>
           </div>"#,
    );
    assert_eq!(author.as_deref(), Some("bob"));
}

#[test]
fn test_profile_link_with_fragment() {
    let author = author_of(
        r#"<div data-pressable-container="true">
             <a href="/@charlie#section">charlie</a>
             <a href="/@charlie/post/789"><time>2 hours ago</time></a>
           </div>"#,
    );
    assert_eq!(author.as_deref(), Some("charlie"));
}

// ============================================================================
// Reposts
// ============================================================================

#[test]
fn test_repost_prefers_original_author() {
    let author = author_of(
        r#"<div data-pressable-container="true">
             <div class="repost-header">
               <a href="/@reposter_user">reposter_user</a>
               <span> reposted 4 hours ago</span>
             </div>
             <div class="original-post">
               <a href="/@original_author">original_author</a>
               <div>
                 <a href="/@original_author/post/123">
                   <time datetime="2025-12-19T11:59:34.000Z">19 hours ago</time>
                 </a>
               </div>
             </div>
           </div>"#,
    );
    assert_eq!(author.as_deref(), Some("original_author"));
}

#[test]
fn test_repost_with_realistic_markup() {
    let author = author_of(
        r#"<div class="x1n2onr6 x1ypdohk" data-pressable-container="true">
             <div class="xqcrz7y x1xdureb x1agbcgv">
               <div class="x6s0dn4 xrvj5dj xd0jker xsag5q8">
                 <div class="x1xdureb x11t971q">
                   <div class="">
                     <span class="xjp7ctv">
                       <div>
                         <a class="x1i10hfl xjbqb8w" href="/@reposter123" role="link">
                           <span>reposter123</span>
                           <span> 在 4 小時前轉發</span>
                         </a>
                       </div>
                     </span>
                   </div>
                 </div>
               </div>
             </div>
             <div class="xrvj5dj x79809l x5yr21d">
               <div class="x6s0dn4 x78zum5 x1q0g3np">
                 <span class="x6s0dn4 x78zum5 x1q0g3np">
                   <div class="">
                     <span class="xjp7ctv">
                       <div>
                         <a class="x1i10hfl xjbqb8w" href="/@originaluser" role="link">
                           <span>originaluser</span>
                         </a>
                       </div>
                     </span>
                   </div>
                 </span>
               </div>
               <div class="x6s0dn4 xmixu3c x78zum5 x5yr21d">
                 <div class="x78zum5 x1c4vz4f x2lah0s">
                   <span class="x1lliihq x1plvlek xryxfnj">
                     <a class="x1i10hfl xjbqb8w" href="/@originaluser/post/DScbldbk5ym" role="link">
                       <time datetime="2025-12-19T11:59:34.000Z">
                         <span><abbr><span>19小時</span></abbr></span>
                       </time>
                     </a>
                   </span>
                 </div>
               </div>
             </div>
           </div>"#,
    );
    assert_eq!(author.as_deref(), Some("originaluser"));
}

// ============================================================================
// Edge cases
// ============================================================================

#[test]
fn test_dotted_username() {
    let author = author_of(
        r#"<div data-pressable-container="true">
             <a href="/@user.with.dots">user.with.dots</a>
             <a href="/@user.with.dots/post/999"><time>1 hour ago</time></a>
           </div>"#,
    );
    assert_eq!(author.as_deref(), Some("user.with.dots"));
}

#[test]
fn test_permalink_is_not_used_as_profile() {
    // Profile link comes after the permalink in document order
    let author = author_of(
        r#"<div data-pressable-container="true">
             <a href="/@testuser/post/123"><time>3 hours ago</time></a>
             <a href="/@testuser">testuser</a>
           </div>"#,
    );
    assert_eq!(author.as_deref(), Some("testuser"));
}

#[test]
fn test_only_permalinks_resolves_to_none() {
    let author = author_of(
        r#"<div data-pressable-container="true">
             <a href="/@ghost/post/1"><time>3 hours ago</time></a>
             <a href="/@ghost/post/2">another</a>
           </div>"#,
    );
    assert_eq!(author, None);
}

#[test]
fn test_deeply_nested_timestamp() {
    let author = author_of(
        r#"<div data-pressable-container="true">
             <a href="/@deepuser">deepuser</a>
             <div><div><div><div>
               <a href="/@deepuser/post/777">
                 <span><span><time>6 hours ago</time></span></span>
               </a>
             </div></div></div></div>
           </div>"#,
    );
    assert_eq!(author.as_deref(), Some("deepuser"));
}

#[test]
fn test_timestamp_inside_profile_link() {
    let html = parse(
        r#"<div data-pressable-container="true">
             <a href="/@someone_else">someone_else</a>
             <a href="/@wrappeduser">
               <span>wrappeduser</span>
               <time>8 hours ago</time>
             </a>
           </div>"#,
    );
    let resolution = threads_resolver()
        .resolve_author(time_element(&html))
        .unwrap();

    assert_eq!(resolution.username.as_deref(), Some("wrappeduser"));
    let matched = resolution.matched.unwrap();
    assert_eq!(matched.source, MatchSource::EnclosingLink);
    assert_eq!(matched.level, 1);
}

// ============================================================================
// Multiple usernames
// ============================================================================

#[test]
fn test_closest_username_wins() {
    let author = author_of(
        r#"<div data-pressable-container="true">
             <a href="/@mentioned_user">@mentioned_user</a>
             <div class="quote">
               <a href="/@quoted_user">quoted_user</a>
             </div>
             <div class="main-content">
               <a href="/@post_author">post_author</a>
               <a href="/@post_author/post/555"><time>4 hours ago</time></a>
             </div>
           </div>"#,
    );
    assert_eq!(author.as_deref(), Some("post_author"));
}

#[test]
fn test_first_profile_in_document_order_wins_within_a_level() {
    let author = author_of(
        r#"<div data-pressable-container="true">
             <div><span><a href="/@first">first</a></span></div>
             <a href="/@second">second</a>
             <a href="/@x/post/1"><time>now</time></a>
           </div>"#,
    );
    assert_eq!(author.as_deref(), Some("first"));
}

// ============================================================================
// Boundary handling
// ============================================================================

#[test]
fn test_boundary_stops_the_climb() {
    let markup = r#"<div class="feed">
         <a href="/@outsider">outsider</a>
         <div data-pressable-container="true">
           <span>no profile link here</span>
           <a href="/@lonely/post/1"><time>1 hour ago</time></a>
         </div>
       </div>"#;

    assert_eq!(author_of(markup), None);

    // Without a boundary the climb reaches the neighbouring link
    let html = parse(markup);
    let unbounded = AuthorResolver::new()
        .resolve_author(time_element(&html))
        .unwrap();
    assert_eq!(unbounded.username.as_deref(), Some("outsider"));
}

#[test]
fn test_boundary_level_itself_is_searched() {
    let author = author_of(
        r#"<div>
             <a href="/@outsider">outsider</a>
             <div data-pressable-container="true">
               <a href="/@insider">insider</a>
               <div><a href="/@insider/post/1"><time>1 hour ago</time></a></div>
             </div>
           </div>"#,
    );
    assert_eq!(author.as_deref(), Some("insider"));
}

#[test]
fn test_custom_boundary_predicate() {
    let html = parse(
        r#"<section>
             <a href="/@outsider">outsider</a>
             <article><a href="/@nobody/post/1"><time>1 hour ago</time></a></article>
           </section>"#,
    );
    let resolver = AuthorResolver::new()
        .with_boundary(PostBoundary::custom(|el| el.value().name() == "article"));
    let resolution = resolver.resolve_author(time_element(&html)).unwrap();
    assert_eq!(resolution.username, None);
    assert!(!resolution.is_found());
}

#[test]
fn test_no_profile_link_anywhere() {
    let html = parse(r#"<div><span><time>now</time></span></div>"#);
    let resolution = resolve_author(time_element(&html)).unwrap();
    assert_eq!(resolution.username, None);
    assert_eq!(resolution.matched, None);
}

// ============================================================================
// Absolute hrefs
// ============================================================================

#[test]
fn test_absolute_profile_links_need_allowed_host() {
    let markup = r#"<div data-pressable-container="true">
         <a href="https://www.threads.net/@absolute">absolute</a>
         <a href="https://www.threads.net/@absolute/post/1"><time>now</time></a>
       </div>"#;

    assert_eq!(author_of(markup), None);

    let html = parse(markup);
    let resolver = threads_resolver().with_allowed_hosts(vec!["threads.net".to_string()]);
    let resolution = resolver.resolve_author(time_element(&html)).unwrap();
    assert_eq!(resolution.username.as_deref(), Some("absolute"));
}

// ============================================================================
// Contract
// ============================================================================

#[test]
fn test_resolution_is_deterministic() {
    let html = parse(
        r#"<div data-pressable-container="true">
             <a href="/@reposter">reposter</a>
             <div><a href="/@author">author</a><a href="/@author/post/1"><time>1h</time></a></div>
           </div>"#,
    );
    let resolver = threads_resolver();
    let first = resolver.resolve_author(time_element(&html)).unwrap();
    let second = resolver.resolve_author(time_element(&html)).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.username.as_deref(), Some("author"));
}

#[test]
fn test_works_on_full_documents() {
    let html = Html::parse_document(
        r#"<!DOCTYPE html><html><body>
             <a href="/@doc_author">doc_author</a>
             <a href="/@doc_author/post/1"><time>1h</time></a>
           </body></html>"#,
    );
    let resolution = resolve_author(time_element(&html)).unwrap();
    assert_eq!(resolution.username.as_deref(), Some("doc_author"));
}

#[test]
fn test_detached_node_is_rejected() {
    let mut html = parse(
        r#"<div><a href="/@alice">alice</a><span><time>1h</time></span></div>"#,
    );
    let span_id = {
        let selector = Selector::parse("span").unwrap();
        html.select(&selector).next().unwrap().id()
    };
    html.tree.get_mut(span_id).unwrap().detach();

    let span = ElementRef::wrap(html.tree.get(span_id).unwrap()).unwrap();
    let result = resolve_author(span);
    assert!(matches!(result, Err(ResolveError::DetachedNode)));
}

#[test]
fn test_resolution_serializes_username_null_when_missing() {
    let html = parse(r#"<div><time>now</time></div>"#);
    let resolution = resolve_author(time_element(&html)).unwrap();
    let json = serde_json::to_string(&resolution).unwrap();
    assert_eq!(json, r#"{"username":null}"#);
}
