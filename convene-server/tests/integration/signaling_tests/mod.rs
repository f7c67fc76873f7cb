mod test_full_negotiation_scenario;
mod test_status_broadcast;
