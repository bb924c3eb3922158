use docqa_client::{ChatSession, ResilientClient, UploadFile};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = ResilientClient::from_env()?;

    let health = client.health_check().await?;
    println!("backend: {}", health.status);

    if let Some(path) = std::env::args().nth(1) {
        let file = UploadFile::from_path(path).await?;
        let uploaded = client.upload_document(&file).await?;
        println!("{} ({} chunks)", uploaded.message, uploaded.chunks);
    }

    let stats = client.get_stats().await?;
    println!(
        "{} chunks across {} documents in {}",
        stats.total_chunks, stats.unique_documents, stats.collection_name
    );

    let mut session = ChatSession::new(&client);
    for question in ["What are these documents about?", "Summarize the first one."] {
        let answer = session.send(question).await?;
        println!("> {question}\n{}", answer.response);
        for source in answer.sources {
            println!("  - {}", source.filename);
        }
    }

    Ok(())
}
