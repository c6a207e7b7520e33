mod basic;
mod canonical;
mod concurrency;
mod sharing;
