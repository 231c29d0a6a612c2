//! Music recommendation: scored first, fixed playlist on failure.

use tracing::warn;

use crate::fallback;
use crate::scoring::ScoringClient;

#[derive(Debug)]
pub struct MusicPick {
    pub video_id: String,
    pub comment: String,
}

pub async fn resolve(
    scoring: &ScoringClient,
    precip_type: Option<&str>,
    sky: Option<&str>,
    hour: u32,
) -> MusicPick {
    let pty = precip_type.unwrap_or("0");
    let sky = sky.unwrap_or("맑음");

    match scoring.music(pty, sky, hour).await {
        Ok((video_id, comment)) => MusicPick { video_id, comment },
        Err(err) => {
            warn!("music scoring unavailable ({err}), using fixed playlist");
            let (video_id, comment) = fallback::music(pty, sky);
            MusicPick {
                video_id: video_id.to_string(),
                comment: comment.to_string(),
            }
        }
    }
}
