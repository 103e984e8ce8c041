use crate::app::{AppContext, Result};
use crate::domain::{CommentsAggregate, PostsPage};

pub async fn show_home(ctx: &AppContext, after: Option<&str>) -> Result<()> {
    let page = ctx.client.get_home_posts(after).await;
    print_or_not_found(page.map(|p| format_posts(&p)))
}

pub async fn show_subreddit(ctx: &AppContext, name: &str, after: Option<&str>) -> Result<()> {
    let page = ctx.client.get_subreddit_posts(name, after).await;
    print_or_not_found(page.map(|p| format_posts(&p)))
}

pub async fn show_comments(ctx: &AppContext, url: &str) -> Result<()> {
    let thread = ctx.client.get_comments(url).await;
    print_or_not_found(thread.map(|t| format_comments(&t)))
}

pub async fn show_post(ctx: &AppContext, id: &str) -> Result<()> {
    let thread = ctx.client.get_post_comments(id).await;
    print_or_not_found(thread.map(|t| format_comments(&t)))
}

pub fn clean_cache(ctx: &AppContext) -> Result<()> {
    ctx.client.clean_cache();
    println!("Removed expired cache entries");
    Ok(())
}

fn print_or_not_found(rendered: Result<String>) -> Result<()> {
    match rendered {
        Ok(text) => {
            print!("{}", text);
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            eprintln!("Nothing here: {}", e);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

pub fn format_posts(page: &PostsPage) -> String {
    let mut out = String::new();

    if !page.description.is_empty() {
        out.push_str(&page.description);
        out.push_str("\n\n");
    }

    if page.posts.is_empty() {
        out.push_str("No posts\n");
    }

    for post in &page.posts {
        out.push_str(&post.headline());
        out.push('\n');
        out.push_str("    ");
        out.push_str(&post.byline());
        out.push('\n');
        if !post.comments_url.is_empty() {
            out.push_str("    ");
            out.push_str(&post.comments_url);
            out.push('\n');
        }
        out.push('\n');
    }

    if !page.after.is_empty() {
        out.push_str(&format!("next page: --after {}\n", page.after));
    }

    out
}

pub fn format_comments(thread: &CommentsAggregate) -> String {
    let mut out = String::new();

    out.push_str(&thread.post_title);
    out.push('\n');
    out.push_str(&format!(
        "{}  by {}  {}  {}\n\n",
        thread.post_points, thread.post_author, thread.subreddit, thread.post_timestamp
    ));

    if !thread.post_text.is_empty() {
        out.push_str(thread.post_text.trim_end());
        out.push_str("\n\n");
    }

    for comment in &thread.comments {
        out.push_str(&comment.byline());
        out.push('\n');
        out.push_str(&comment.indented_text());
        out.push_str("\n\n");
    }

    out
}
