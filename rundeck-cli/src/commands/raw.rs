//! Raw API access through the transform registry

use anyhow::{Context, Result};
use rundeck_client::{ApiRequest, ResponseKind, RundeckClient};

pub async fn fetch(
    client: &RundeckClient,
    kind: &str,
    path: &str,
    params: Vec<(String, String)>,
) -> Result<()> {
    let kind: ResponseKind = kind.parse()?;
    let request = ApiRequest::get(path.trim_start_matches('/')).with_query(params);

    let result = client
        .apply(kind, request)
        .await
        .with_context(|| format!("GET {} as {} failed", path, kind))?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
