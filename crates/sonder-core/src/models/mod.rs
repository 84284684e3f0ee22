pub mod assessment;
pub mod remote_link;
pub mod scoring;
pub mod tenant;
