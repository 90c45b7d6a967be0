use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use client_core::{
    default_voice, group_by_category, load_settings, AddFaqForm, AdminApi, HttpAdminApi, ItemView,
    ListController, Settings, Submission,
};
use shared::{
    domain::{Faq, FaqId, QuestionId, UnansweredQuestion, Voice, VoiceId},
    protocol::FaqUpdate,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "admin_cli", about = "Manage FAQs, unanswered questions and voices")]
struct Cli {
    /// Overrides the CRUD API origin from settings.
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Overrides the preview service origin from settings.
    #[arg(long, global = true)]
    preview_url: Option<String>,
    /// Print records as JSON instead of text lines.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(subcommand)]
    Faq(FaqCommand),
    #[command(subcommand)]
    Unanswered(UnansweredCommand),
    #[command(subcommand)]
    Voices(VoicesCommand),
}

#[derive(Subcommand, Debug)]
enum FaqCommand {
    List {
        /// Print FAQs sectioned by category.
        #[arg(long)]
        grouped: bool,
    },
    Add {
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
        #[arg(long)]
        category: Option<String>,
    },
    Update {
        id: i64,
        #[command(flatten)]
        fields: FaqUpdateArgs,
    },
    Delete {
        id: i64,
    },
}

#[derive(ClapArgs, Debug)]
struct FaqUpdateArgs {
    #[arg(long)]
    question: Option<String>,
    #[arg(long)]
    answer: Option<String>,
    #[arg(long)]
    category: Option<String>,
}

impl From<FaqUpdateArgs> for FaqUpdate {
    fn from(args: FaqUpdateArgs) -> Self {
        FaqUpdate {
            question: args.question,
            answer: args.answer,
            category: args.category,
        }
    }
}

#[derive(Subcommand, Debug)]
enum UnansweredCommand {
    List,
    Convert {
        id: i64,
        #[arg(long)]
        answer: String,
        #[arg(long)]
        category: Option<String>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
enum VoicesCommand {
    List,
    SetDefault {
        id: i64,
    },
    /// Downloads the preview clip of a voice.
    Preview {
        id: i64,
        #[arg(long)]
        out: PathBuf,
    },
}

fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = load_settings()?;
    if let Some(url) = &cli.api_url {
        settings.api_base_url = url.clone();
    }
    if let Some(url) = &cli.preview_url {
        settings.preview_base_url = url.clone();
    }
    settings.normalize()?;
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let settings = resolve_settings(&cli)?;
    tracing::debug!(api = %settings.api_base_url, preview = %settings.preview_base_url, "settings resolved");
    let api: Arc<dyn AdminApi> = Arc::new(HttpAdminApi::new(&settings));

    match cli.command {
        Command::Faq(cmd) => run_faq(api, cmd, cli.json).await,
        Command::Unanswered(cmd) => run_unanswered(api, cmd, cli.json).await,
        Command::Voices(cmd) => run_voices(api, cmd, cli.json).await,
    }
}

async fn run_faq(api: Arc<dyn AdminApi>, cmd: FaqCommand, json: bool) -> Result<()> {
    let faqs = ListController::<Faq>::new(api);
    let handle = faqs.handle();

    match cmd {
        FaqCommand::List { grouped } => {
            handle.load().await?;
            let items = faqs.items();
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else if grouped {
                for group in group_by_category(&items) {
                    println!("== {} ({}) ==", group.category, group.faqs.len());
                    for faq in group.faqs {
                        println!("{}\t{}", faq.id, faq.question);
                    }
                }
            } else {
                for faq in &items {
                    println!("{}\t[{}]\t{}", faq.id, faq.category_key(), faq.question);
                }
            }
        }
        FaqCommand::Add {
            question,
            answer,
            category,
        } => {
            let mut form = AddFaqForm::new(Vec::new());
            form.question = question;
            form.answer = answer;
            if let Some(category) = category {
                form.category.start_new();
                if let Some(name) = form.category.new_name_mut() {
                    *name = category;
                }
            }
            let fields = form
                .begin_submit()
                .ok_or_else(|| anyhow!("question, answer and category must not be blank"))?;
            let created = handle.create(fields).await?;
            print_created(&created, json)?;
        }
        FaqCommand::Update { id, fields } => {
            let update = FaqUpdate::from(fields);
            if update.is_empty() {
                bail!("nothing to update; pass --question, --answer or --category");
            }
            handle.load().await?;
            handle.update(FaqId(id), update).await?;
            println!("updated faq {id}");
        }
        FaqCommand::Delete { id } => {
            handle.delete(FaqId(id)).await?;
            println!("deleted faq {id}");
        }
    }
    Ok(())
}

fn print_created(faq: &Faq, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(faq)?);
    } else {
        println!("created faq {} in '{}'", faq.id, faq.category_key());
    }
    Ok(())
}

async fn run_unanswered(api: Arc<dyn AdminApi>, cmd: UnansweredCommand, json: bool) -> Result<()> {
    let questions = ListController::<UnansweredQuestion>::new(api);
    let handle = questions.handle();

    match cmd {
        UnansweredCommand::List => {
            handle.load().await?;
            let items = questions.items();
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                for question in &items {
                    println!(
                        "{}\tx{}\t{}\t{}",
                        question.id,
                        question.frequency,
                        question.timestamp.format("%Y-%m-%d %H:%M"),
                        question.question
                    );
                }
            }
        }
        UnansweredCommand::Convert {
            id,
            answer,
            category,
        } => {
            let mut view = ItemView::new(QuestionId(id));
            view.start_convert(Vec::new());
            if let Some(draft) = view.convert_draft_mut() {
                draft.answer = answer;
                if let Some(category) = category {
                    draft.category.start_new();
                    if let Some(name) = draft.category.new_name_mut() {
                        *name = category;
                    }
                }
            }
            let Some(Submission::Convert { id, request }) = view.submit() else {
                bail!("answer and category must not be blank");
            };
            let category = request.category.clone();
            handle.convert(id, request).await?;
            println!("converted question {id} into a faq in '{category}'");
        }
        UnansweredCommand::Delete { id } => {
            handle.delete(QuestionId(id)).await?;
            println!("deleted question {id}");
        }
    }
    Ok(())
}

async fn run_voices(api: Arc<dyn AdminApi>, cmd: VoicesCommand, json: bool) -> Result<()> {
    let voices = ListController::<Voice>::new(Arc::clone(&api));
    let handle = voices.handle();
    handle.load().await?;

    match cmd {
        VoicesCommand::List => {
            let items = voices.items();
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                for voice in &items {
                    let marker = if voice.is_default { "*" } else { " " };
                    println!(
                        "{marker} {}\t{}\t{}\t{}",
                        voice.id,
                        voice.name,
                        voice.model,
                        voice.description.as_deref().unwrap_or("")
                    );
                }
            }
        }
        VoicesCommand::SetDefault { id } => {
            let id = VoiceId(id);
            let items = voices.items();
            if default_voice(&items).is_some_and(|voice| voice.id == id) {
                println!("voice {id} is already the default");
                return Ok(());
            }
            handle.set_default(id).await?;
            println!("voice {id} is now the default");
        }
        VoicesCommand::Preview { id, out } => {
            let voice = voices
                .read(|list| list.get(VoiceId(id)).cloned())
                .ok_or_else(|| anyhow!("no voice with id {id}"))?;
            let bytes = api.fetch_preview(&voice.model).await?;
            tokio::fs::write(&out, &bytes)
                .await
                .with_context(|| format!("failed to write preview to '{}'", out.display()))?;
            println!(
                "wrote {} bytes of '{}' preview to {}",
                bytes.len(),
                voice.model,
                out.display()
            );
        }
    }
    Ok(())
}
