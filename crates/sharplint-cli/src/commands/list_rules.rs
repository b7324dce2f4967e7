//! List rules command implementation.

use sharplint_rules::{all_fixes, all_rules};

/// Runs the list-rules command.
pub fn run() {
    let fixes = all_fixes();

    println!("Available rules:\n");
    println!(
        "{:<10} {:<26} {:<9} {:<12} Description",
        "Code", "Name", "Severity", "Fix"
    );
    println!("{}", "-".repeat(100));

    for rule in all_rules() {
        let fix = match fixes.provider_for(rule.code()) {
            Some(fix) if fix.supports_fix_all() => "fix-all",
            Some(_) => "single",
            None => "-",
        };
        println!(
            "{:<10} {:<26} {:<9} {:<12} {}",
            rule.code(),
            rule.name(),
            rule.default_severity().to_string(),
            fix,
            rule.description()
        );
    }

    println!("\nPresets:");
    println!("  recommended  - BA00001 to BA00007 (default)");
    println!("  minimal      - BA00006, BA00007 (for gradual adoption)");
    println!("  naming       - BA00001, BA00003");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  sharplint check --rules enum-zero-duplicate,prefer-implicit-type");
    println!("  sharplint fix --rules BA00004,BA00005");
}
