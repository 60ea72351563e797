
mod test_leaderboard;
mod test_local_store;
mod test_ping_flow;
