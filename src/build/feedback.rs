use colored::*;

/// Turns common compiler diagnostics into actionable hints.
pub struct FeedbackAnalyzer;

impl FeedbackAnalyzer {
    pub fn analyze(output: &str) -> Option<String> {
        // 1. Missing main (linker)
        if output.contains("undefined symbol 'main'")
            || output.contains("undefined reference to `main'")
        {
            return Some(format!(
                "Your package is missing a {} function.\nAdd one to the entrypoint, or set {} if this is a library.",
                "main()".bold().yellow(),
                "\"buildOptions\": { \"type\": \"lib\" }".bold().green()
            ));
        }

        // 2. Unresolved symbol (linker)
        if output.contains("undefined symbol") || output.contains("undefined reference to") {
            return Some(format!(
                "It looks like a {} error.\nThe symbol may live in a library that isn't listed in {} of package.json.",
                "Linker".bold().red(),
                "\"dependencies\"".bold().yellow()
            ));
        }

        // 3. Missing header (compiler)
        if output.contains("include file") && output.contains("not found")
            || output.contains("No such file or directory")
        {
            return Some(format!(
                "It looks like a {} error.\nCheck {} in package.json, and that every dependency lists the directory in its {}.",
                "Missing Header".bold().red(),
                "\"lattice.imports\"".bold().yellow(),
                "\"lattice.exports\"".bold().yellow()
            ));
        }

        None
    }
}
