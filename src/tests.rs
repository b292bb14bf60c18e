mod auth;
mod jobs;
mod users;
