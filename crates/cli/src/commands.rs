//! Command execution on top of the catalog view.

use anyhow::{Context, Result};
use bookstore_client::render::{render_book, render_catalog};
use bookstore_client::{
    BookForm, CatalogClient, CatalogView, Notice, NoticeKind, Preferences, Theme,
};

use crate::{Cli, Commands, EditArgs, ListArgs};

/// Execute the parsed command line.
///
/// # Errors
///
/// Returns an error if the API is unreachable, rejects the request, or the
/// preferences file cannot be written.
pub async fn execute(cli: Cli) -> Result<()> {
    let mut prefs = Preferences::load(&cli.prefs);

    if let Commands::Theme { toggle } = &cli.command {
        let theme = if *toggle {
            prefs
                .toggle_dark_mode(&cli.prefs)
                .with_context(|| format!("failed to save {}", cli.prefs.display()))?
        } else {
            prefs.theme()
        };
        println!("{}", theme_name(theme));
        return Ok(());
    }

    let api_url = cli.api_url();
    tracing::debug!(%api_url, "using catalog API");
    let client = CatalogClient::new(api_url)?;
    let theme = (!cli.no_color).then(|| prefs.theme());

    match cli.command {
        Commands::List(args) => list(client, &args, theme).await,
        Commands::Show { id } => {
            let book = client.get_book(&id).await?;
            println!("{}", render_book(&book));
            Ok(())
        }
        Commands::Genres => {
            for genre in client.genres().await? {
                println!("{genre}");
            }
            Ok(())
        }
        Commands::Authors => {
            for author in client.authors().await? {
                println!("{author}");
            }
            Ok(())
        }
        Commands::Add(args) => {
            let mut view = CatalogView::new(client);
            view.open_add();
            let outcome = view.submit_add(&args.to_form()).await;
            report(view.take_notices());
            let book = outcome?;
            println!("{}", render_book(&book));
            Ok(())
        }
        Commands::Edit(args) => edit(client, &args).await,
        Commands::Delete { id } => {
            let book = client.get_book(&id).await?;
            let mut view = CatalogView::new(client);
            view.open_delete(book);
            let outcome = view.confirm_delete().await;
            report(view.take_notices());
            outcome?;
            Ok(())
        }
        Commands::Theme { .. } => Ok(()),
    }
}

async fn list(client: CatalogClient, args: &ListArgs, theme: Option<Theme>) -> Result<()> {
    let mut view = CatalogView::new(client);

    if let Some(text) = &args.search {
        view.set_search(text.as_str()).await?;
    } else if let Some(genre) = &args.genre {
        view.set_genre(genre.as_str()).await?;
    } else if let Some(author) = &args.author {
        view.set_author(author.as_str()).await?;
    } else {
        view.load().await?;
    }

    println!("{}", render_catalog(&view.books, &view.meta, theme));
    Ok(())
}

async fn edit(client: CatalogClient, args: &EditArgs) -> Result<()> {
    let book = client.get_book(&args.id).await?;
    let mut form = BookForm::from_book(&book);
    args.apply(&mut form);

    let mut view = CatalogView::new(client);
    view.open_edit(book);
    let outcome = view.submit_edit(&form).await;
    report(view.take_notices());

    if let Some(updated) = outcome? {
        println!("{}", render_book(&updated));
    }
    Ok(())
}

fn report(notices: Vec<Notice>) {
    for notice in notices {
        match notice.kind {
            NoticeKind::Success => println!("{}", notice.message),
            NoticeKind::Error => eprintln!("{}", notice.message),
        }
    }
}

fn theme_name(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
    }
}
