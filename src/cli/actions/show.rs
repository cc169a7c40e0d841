use crate::config::Host;
use colored::Colorize;
use std::collections::BTreeMap;

pub fn handle(hosts: &BTreeMap<String, Host>) {
    if hosts.is_empty() {
        println!("No hosts configured");
        return;
    }

    println!("Hosts:");
    for (name, host) in hosts {
        match host.masked_account_id() {
            Some(account_id) => println!("   - {name} ({account_id})"),
            None => println!("   - {name}"),
        }
        for (setting, present) in host.configured() {
            let mark = if present { "✓".green() } else { "✗".red() };
            println!("       {mark} {setting}");
        }
    }
}
