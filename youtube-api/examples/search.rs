use youtube_api::{Client, Request, YoutubeApiError};

#[tokio::main]
pub async fn main() -> Result<(), YoutubeApiError> {
    let client = Client::new("access_token");

    let req = Request::search().channels("GoogleDevelopers").max_results(1u32);

    let res = client.send(req).await?;
    for channel_id in res.channel_ids() {
        println!("{}", channel_id);
    }
    Ok(())
}
