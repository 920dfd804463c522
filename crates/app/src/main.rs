use chrono::Utc;
use clap::Parser;
use doc_answer_core::{
    AnswerCandidate, Clue, IdGenerators, PrimarySearchStage, QuestionContext, QuestionDashboard,
    StageConfig,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "doc-answer", version)]
struct Cli {
    /// Question text
    #[arg(long)]
    question: String,

    /// Plain clue used as a full-text search term (repeatable)
    #[arg(long = "clue")]
    clues: Vec<String>,

    /// Phrase clue; kept on the question but never searched (repeatable)
    #[arg(long = "phrase")]
    phrases: Vec<String>,

    /// Elasticsearch base URL
    #[arg(long, env = "DOCANSWER_ES_URL", default_value = "http://localhost:9200")]
    es_url: String,

    /// Elasticsearch cluster name
    #[arg(long, env = "DOCANSWER_ES_CLUSTER", default_value = "elasticsearch_szednik")]
    es_cluster: String,

    /// Elasticsearch index name
    #[arg(long, env = "DOCANSWER_ES_INDEX", default_value = "zen")]
    es_index: String,

    /// Elasticsearch document type
    #[arg(long, env = "DOCANSWER_ES_TYPE", default_value = "abstract")]
    es_type: String,

    /// Number of hits to request
    #[arg(long, env = "DOCANSWER_HITLIST_SIZE", default_value = "20")]
    hitlist_size: usize,

    /// Parallel pipeline jobs the orchestrator runs
    #[arg(long, default_value = "1")]
    max_jobs: usize,

    /// Print candidates as JSON lines
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = StageConfig {
        endpoint: cli.es_url,
        cluster_name: cli.es_cluster,
        index: cli.es_index,
        doc_type: cli.es_type,
        hit_list_size: cli.hitlist_size,
    };

    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        candidate_instances = PrimarySearchStage::<doc_answer_core::ElasticsearchIndex>::candidate_instances_required(cli.max_jobs),
        "doc-answer boot"
    );

    let stage = PrimarySearchStage::open(config, IdGenerators::default()).await?;

    let clues = cli
        .clues
        .into_iter()
        .map(Clue::plain)
        .chain(cli.phrases.into_iter().map(Clue::phrase))
        .collect();
    let question = QuestionContext::new(cli.question, clues);
    let dashboard = Arc::new(QuestionDashboard::new());

    let outcome = run_question(&stage, &question, dashboard.clone(), cli.json).await;
    stage.close();
    let produced = outcome?;

    if !cli.json {
        for snippet in dashboard.snippets() {
            if let Some(source) = dashboard.answer_source(snippet.source_id) {
                println!(
                    "snippet={} source={} origin={} title={} id={}",
                    snippet.snippet_id,
                    snippet.source_id,
                    source.origin.as_str(),
                    source.title,
                    source.url
                );
            }
        }
        println!("{produced} candidates produced at {}", Utc::now().to_rfc3339());
    }

    Ok(())
}

async fn run_question(
    stage: &PrimarySearchStage,
    question: &QuestionContext,
    dashboard: Arc<QuestionDashboard>,
    json: bool,
) -> anyhow::Result<usize> {
    let mut multiplier = stage.process(question, dashboard).await?;
    let mut produced = 0;

    while multiplier.has_more() {
        let candidate = match multiplier.produce_next() {
            Ok(candidate) => candidate,
            Err(error) => {
                warn!(position = multiplier.position() + 1, %error, "skipping question");
                return Err(error.into());
            }
        };
        produced += 1;
        print_candidate(&candidate, json)?;
    }

    Ok(produced)
}

fn print_candidate(candidate: &AnswerCandidate, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(candidate)?);
        return Ok(());
    }

    let info = &candidate.result_info;
    if candidate.is_fallback() {
        println!("[empty] is_last={}", info.is_last);
        return Ok(());
    }

    println!(
        "[{}] score={:.4} document_id={} title={} is_last={}",
        info.source, info.relevance, info.document_id, info.document_title, info.is_last
    );
    for resource in &candidate.answer_info.resources {
        println!("  iri={}", resource.iri);
    }
    if let Some(features) = &candidate.answer_info.features {
        for (feature, value) in features.iter() {
            println!("  feature {feature:?}={value:.4}");
        }
    }
    if !candidate.document_text.is_empty() {
        println!("  abstract:\n{}", candidate.document_text);
    }
    Ok(())
}
