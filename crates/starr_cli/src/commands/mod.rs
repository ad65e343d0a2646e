pub(crate) mod lidarr;
pub(crate) mod meta;
pub(crate) mod output;
pub(crate) mod radarr;
pub(crate) mod readarr;
pub(crate) mod shared;
pub(crate) mod sonarr;
