pub mod display_time;
pub mod now_playing;
pub mod routing;
pub mod tracks;

// Re-export commonly used items
pub use display_time::{DEFAULT_DISPLAY_TIMEZONE, DISPLAY_FORMAT, format_for_display, from_epoch_seconds};
pub use now_playing::NowPlayingView;
pub use routing::{Page, RouteMatch, RouteNotFound, RouteTable};
pub use tracks::{PartitionedTracks, RawTrack, TrackRecord, partition_tracks};

pub use chrono_tz::Tz;
