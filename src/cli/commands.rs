use std::io::Write;

use anyhow::{anyhow, bail, Context, Result};
use log::info;
use serde::Serialize;

use super::args::Command;
use super::render;
use crate::data::{database, NewsDb};
use crate::models::{ArticleId, ReportKind, SortBy, TagId, User, UserId, Year};

fn write_json<W: Write + ?Sized, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Resolves credentials to a user, failing on a bad username or password
fn login(db: &NewsDb, username: &str, password: &str) -> Result<User> {
    let id = db
        .users()
        .validate(username, password)?
        .ok_or_else(|| anyhow!("Invalid username or password"))?;
    Ok(db.users().get(id)?)
}

/// Executes one command against an open database, writing its output to `out`
pub fn execute<W: Write + ?Sized>(db: &NewsDb, command: Command, out: &mut W) -> Result<()> {
    match command {
        Command::Init { seed } => {
            if seed {
                db.load_seed().context("Failed to load the sample catalog")?;
            }
            writeln!(out, "Database initialized{}", if seed { " with sample data" } else { "" })?;
        }
        Command::Drop => {
            database::drop_schema(&*db.pool().get()?)?;
            writeln!(out, "All tables dropped")?;
        }
        Command::Login { username, password } => {
            let user = login(db, &username, &password)?;
            info!("'{}' logged in", user.username);
            writeln!(out, "Logged in as {} (id {}, {})", user.username, user.id, user.role)?;
        }
        Command::Articles {
            sort,
            category,
            tag,
            search,
            json,
        } => {
            let sort_by: SortBy = sort.parse()?;
            let articles = match (category, tag, search) {
                (Some(category), _, _) => {
                    let category = db.categories().get(&category)?;
                    db.articles().list_by_category(&category.name, sort_by)?
                }
                (_, Some(tag), _) => {
                    let tag = db.tags().get(tag.parse::<TagId>()?)?;
                    db.articles().list_by_tag(tag.id, sort_by)?
                }
                (_, _, Some(query)) => db.articles().search(&query, sort_by)?,
                _ => db.articles().list_all(sort_by)?,
            };

            if json {
                write_json(out, &articles)?;
            } else if articles.is_empty() {
                writeln!(out, "No articles found")?;
            } else {
                writeln!(out, "Got {} article(s) (sorted by {})", articles.len(), sort_by)?;
                write!(out, "{}", render::article_list(&articles))?;
            }
        }
        Command::Show { id, json } => {
            let id: ArticleId = id.parse()?;
            let article = db.articles().get(id)?;
            let categories = db.articles().get_categories(id)?;
            let comments = db.articles().get_comments(id)?;

            if json {
                write_json(
                    out,
                    &serde_json::json!({
                        "article": article,
                        "categories": categories,
                        "comments": comments,
                    }),
                )?;
            } else {
                write!(out, "{}", render::article_detail(&article, &categories, &comments))?;
            }
        }
        Command::View { article, user } => {
            let article: ArticleId = article.parse()?;
            let user: UserId = user.parse()?;
            db.articles().add_view(article, user)?;
            writeln!(out, "Recorded view of article {article} by user {user}")?;
        }
        Command::Comment { article, user, text } => {
            let article: ArticleId = article.parse()?;
            let user: UserId = user.parse()?;
            let id = db.articles().add_comment(article, user, &text)?;
            writeln!(out, "Added comment {id}")?;
        }
        Command::Categories => {
            let mut rows = vec![vec!["Category".to_string(), "Description".to_string()]];
            rows.extend(db.categories().list_all()?.into_iter().map(|c| {
                vec![c.name, c.description.unwrap_or_default()]
            }));
            write!(out, "{}", render::text_table(&rows))?;
        }
        Command::Tags => {
            let mut rows = vec![vec!["ID".to_string(), "Tag".to_string(), "Category".to_string()]];
            rows.extend(
                db.tags()
                    .list_all()?
                    .into_iter()
                    .map(|t| vec![t.id.to_string(), t.name, t.category_name]),
            );
            write!(out, "{}", render::text_table(&rows))?;
        }
        Command::Report {
            kind,
            year,
            as_user,
            password,
            json,
        } => {
            let year: Year = year.parse()?;
            let user = login(db, &as_user, &password)?;
            if !user.role.can_run_reports() {
                bail!("User '{}' is not an administrator", user.username);
            }

            let table = db.reports().run(ReportKind::from(kind), year)?;
            if json {
                write_json(out, &table)?;
            } else {
                write!(out, "{}", render::report(&table))?;
            }
        }
    }
    Ok(())
}
