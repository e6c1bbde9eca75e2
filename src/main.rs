use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use folio::article::Catalog;
use folio::build::{self, build_site};
use folio::clean::clean_notion_html;
use folio::config::Config;
use folio::feed::{write_feed, FeedConfig};
use folio::listing::SearchPager;
use folio::render::Document;
use folio::scaffold::{create_article, Prompter};
use folio::util::{create, open};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let matches = App::new("folio")
        .about("Catalog, search, and authoring tools for a static portfolio blog")
        .version(env!("CARGO_PKG_VERSION"))
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("project")
                .long("project")
                .value_name("DIR")
                .takes_value(true)
                .global(true)
                .help("The project directory (folio.yaml is searched for here and in its parents)"),
        )
        .subcommand(
            SubCommand::with_name("build")
                .about("Writes the writing page with its search data, the sitemap, and the feed")
                .arg(output_arg("DIR", "The output directory (defaults to the project directory)")),
        )
        .subcommand(
            SubCommand::with_name("search")
                .about("Prints the articles matching a query")
                .arg(
                    Arg::with_name("all")
                        .long("all")
                        .help("Print every page of results instead of only the first"),
                )
                .arg(Arg::with_name("QUERY").required(true).multiple(true)),
        )
        .subcommand(
            SubCommand::with_name("sitemap")
                .about("Writes sitemap.xml")
                .arg(output_arg("FILE", "Where to write the sitemap; `-` for stdout")),
        )
        .subcommand(
            SubCommand::with_name("feed")
                .about("Writes the Atom feed")
                .arg(output_arg("FILE", "Where to write the feed; `-` for stdout")),
        )
        .subcommand(
            SubCommand::with_name("clean")
                .about("Strips Notion export markup from an HTML file")
                .arg(Arg::with_name("INPUT").required(true)),
        )
        .subcommand(
            SubCommand::with_name("new")
                .about("Creates a new article interactively")
                .arg(
                    Arg::with_name("markdown")
                        .long("markdown")
                        .help("Treat the content as markdown instead of HTML"),
                ),
        )
        .get_matches();

    let today = Local::now().date_naive();
    match matches.subcommand() {
        ("build", Some(m)) => cmd_build(&config(m)?, m, today),
        ("search", Some(m)) => cmd_search(&config(m)?, m),
        ("sitemap", Some(m)) => cmd_sitemap(&config(m)?, m, today),
        ("feed", Some(m)) => cmd_feed(&config(m)?, m),
        ("clean", Some(m)) => cmd_clean(m),
        ("new", Some(m)) => cmd_new(&config(m)?, m, today),
        (name, _) => Err(anyhow!("Unknown command `{}`", name)),
    }
}

fn output_arg<'a>(name: &'a str, help: &'a str) -> Arg<'a, 'a> {
    Arg::with_name("output")
        .long("output")
        .short("o")
        .value_name(name)
        .takes_value(true)
        .help(help)
}

fn config(m: &ArgMatches) -> Result<Config> {
    let dir = match m.value_of("project") {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir().context("Getting the current directory")?,
    };
    Config::from_directory(&dir)
}

/// Opens the `--output` target: stdout for `-`, otherwise the given file or
/// `default` under the project directory.
fn output(config: &Config, m: &ArgMatches, default: &str) -> Result<Box<dyn Write>> {
    match m.value_of("output") {
        Some("-") => Ok(Box::new(std::io::stdout())),
        Some(path) => Ok(Box::new(BufWriter::new(create(Path::new(path), "output")?))),
        None => Ok(Box::new(BufWriter::new(create(
            &config.root_directory.join(default),
            "output",
        )?))),
    }
}

fn cmd_build(config: &Config, m: &ArgMatches, today: NaiveDate) -> Result<()> {
    let out = m
        .value_of("output")
        .map(PathBuf::from)
        .unwrap_or_else(|| config.root_directory.clone());
    let summary = build_site(config, &out, today)?;
    println!(
        "Built {} articles and {} static pages into {}",
        summary.articles,
        summary.static_pages,
        out.display()
    );
    Ok(())
}

fn cmd_search(config: &Config, m: &ArgMatches) -> Result<()> {
    let query = m.values_of("QUERY").map(|v| v.collect::<Vec<_>>().join(" ")).unwrap_or_default();
    let catalog = Catalog::load(&config.catalog_path)?;
    let mut pager = SearchPager::new(
        catalog.records(),
        config.articles_per_page,
        Document::without_indicators(),
    );
    pager.on_input(&query);
    if m.is_present("all") {
        while pager.load_more() > 0 {}
    }

    if pager.filtered().is_empty() {
        println!("No articles found.");
        return Ok(());
    }
    let doc = pager.sink();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for fragment in doc.fragments().unwrap_or_default() {
        write!(out, "{}", fragment)?;
    }
    eprintln!(
        "Showing {} of {} matching articles",
        pager.shown(),
        pager.filtered().len()
    );
    Ok(())
}

fn cmd_sitemap(config: &Config, m: &ArgMatches, today: NaiveDate) -> Result<()> {
    let catalog = Catalog::load(&config.catalog_path)?;
    let mut w = output(config, m, build::SITEMAP)?;
    build::write_sitemap(config, &catalog, today, &mut w)?;
    w.flush()?;

    let summary = format!(
        "Sitemap has {} URLs: {} static pages, {} articles",
        config.static_pages.len() + catalog.len(),
        config.static_pages.len(),
        catalog.len()
    );
    match m.value_of("output") {
        Some("-") => eprintln!("{}", summary),
        _ => println!("{}", summary),
    }
    Ok(())
}

fn cmd_feed(config: &Config, m: &ArgMatches) -> Result<()> {
    let catalog = Catalog::load(&config.catalog_path)?;
    let mut w = output(config, m, build::FEED)?;
    write_feed(&FeedConfig::from(config), catalog.records(), &mut w)?;
    w.flush()?;
    Ok(())
}

fn cmd_clean(m: &ArgMatches) -> Result<()> {
    let input = m.value_of("INPUT").ok_or_else(|| anyhow!("Missing input file"))?;
    let mut html = String::new();
    open(Path::new(input), "input")?
        .read_to_string(&mut html)
        .with_context(|| format!("Reading input file `{}`", input))?;

    print!("{}", clean_notion_html(&html));
    eprintln!("Cleaned `{}`. Next steps:", input);
    eprintln!("  1. Paste the output into the article page's content section");
    eprintln!("  2. Add the article to the catalog (or use `folio new`)");
    eprintln!("  3. Run `folio build` to refresh the writing page, sitemap, and feed");
    Ok(())
}

fn cmd_new(config: &Config, m: &ArgMatches, today: NaiveDate) -> Result<()> {
    let draft = {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let mut prompter = Prompter::new(stdin.lock(), stdout.lock());
        prompter.draft(today, m.is_present("markdown"))?
    };
    let created = create_article(config, &draft, today)?;

    println!();
    println!("Created {}", created.page_path.display());
    println!("Added `{}` to {}", created.record.url, config.catalog_path.display());
    println!("Run `folio build` to refresh the writing page, sitemap, and feed.");
    Ok(())
}
