use clap::Parser as CliParser;
use psic::{
    ast::Program,
    codegen::CodeGenerator,
    errors::{PsiError, PsiResult},
    frontend::{Lexer, Parser},
    read,
    semantic::TypeChecker,
};
use std::{fs, path::PathBuf, time::Instant};

#[derive(CliParser)]
#[command(
    author,
    version,
    about = "PSI compiler that generates IL assembly",
    long_about = "PSI compiler that generates IL assembly.\n\
                 This compiler takes PSI (Pascal-like) source code and generates\n\
                 stack-based IL assembly text for an ilasm-style assembler.\n\
                 It performs parsing, type annotation and code generation.\n\
                 \n\
                 Example usage:\n\
                 psic input.pas                    # Compile to IL\n\
                 psic input.pas -o output.il       # Specify output file\n\
                 psic input.pas --print-il         # Print IL code\n\
                 psic input.pas --verbose          # Verbose compilation output\n\
                 psic input.pas --timing           # Show compilation timing\n\
                 psic input.pas --show-ast         # Display abstract syntax tree"
)]
struct Cli {
    // The path to the file to compile
    path: PathBuf,

    // Output file path (defaults to input file with .il extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    // Print the generated IL
    #[arg(short = 'i', long)]
    print_il: bool,

    // Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    // Show compilation timing
    #[arg(short, long)]
    timing: bool,

    // Show AST after type annotation
    #[arg(long)]
    show_ast: bool,
}

// Compilation statistics for performance analysis
#[derive(Debug, Default)]
struct CompilationStats {
    parser_time: f64,
    typecheck_time: f64,
    codegen_time: f64,
    total_time: f64,
    source_lines: usize,
    il_lines: usize,
}

// Print error message and exit with error code
fn fatal(msg: &str) -> ! {
    eprintln!("Error: {}", msg);
    std::process::exit(1);
}

// Generate output file path from input path if not specified
fn determine_output_path(input_path: &PathBuf, output: &Option<PathBuf>) -> PathBuf {
    match output {
        Some(path) => path.clone(),
        None => {
            let basename = input_path.file_stem().unwrap_or_default();
            let mut path = PathBuf::from(basename);
            path.set_extension("il");
            path
        }
    }
}

// Scan and parse; the scanner runs on demand inside the parser
fn parsing_phase(
    name: &str,
    source: &str,
    stats: &mut CompilationStats,
    verbose: bool,
) -> PsiResult<(Program, TypeChecker)> {
    let parser_start = Instant::now();
    let mut parser = Parser::new(Lexer::new(name, source));
    let program = parser.parse()?;
    let checker = TypeChecker::new(parser.source().clone());
    stats.parser_time = parser_start.elapsed().as_secs_f64();
    stats.source_lines = parser.source().lines.len();

    if verbose {
        println!("✓ Parsing completed in {:.3}s", stats.parser_time);
        println!("  Read {} source lines", stats.source_lines);
    }

    Ok((program, checker))
}

fn type_annotation_phase(
    program: Program,
    checker: TypeChecker,
    stats: &mut CompilationStats,
    verbose: bool,
) -> PsiResult<Program> {
    let typecheck_start = Instant::now();
    let program = checker.annotate(program)?;
    stats.typecheck_time = typecheck_start.elapsed().as_secs_f64();

    if verbose {
        println!("✓ Type annotation completed in {:.3}s", stats.typecheck_time);
    }

    Ok(program)
}

fn code_generation_phase(program: &Program, stats: &mut CompilationStats, verbose: bool) -> PsiResult<String> {
    let codegen_start = Instant::now();
    let il_output = CodeGenerator::new().generate(program)?;
    stats.codegen_time = codegen_start.elapsed().as_secs_f64();
    stats.il_lines = il_output.lines().filter(|line| !line.trim().is_empty()).count();

    if verbose {
        println!("✓ Code generation completed in {:.3}s", stats.codegen_time);
        println!("  Generated {} IL lines", stats.il_lines);
    }

    Ok(il_output)
}

// Main compilation function
fn compile(input_path: &PathBuf, args: &Cli) -> PsiResult<(String, CompilationStats)> {
    let start_time = Instant::now();
    let mut stats = CompilationStats::default();

    if args.verbose {
        println!(" Starting compilation of: {}", input_path.display());
    }

    if !input_path.exists() {
        return Err(PsiError::compilation_error(
            "file not found",
            format!("Input file does not exist: {}", input_path.display()),
        ));
    }

    let source_str = read(input_path)?;
    if args.verbose {
        println!("Read {} bytes from input file", source_str.len());
    }

    let name = input_path.display().to_string();
    let (program, checker) = parsing_phase(&name, &source_str, &mut stats, args.verbose)?;
    let program = type_annotation_phase(program, checker, &mut stats, args.verbose)?;

    if args.show_ast {
        println!("\n Abstract Syntax Tree:");
        println!("{:#?}", program);
    }

    let il_output = code_generation_phase(&program, &mut stats, args.verbose)?;

    if args.print_il {
        println!("\n Generated IL:");
        println!("{}", il_output);
    }

    stats.total_time = start_time.elapsed().as_secs_f64();

    if args.verbose {
        println!(" Compilation completed in {:.3}s", stats.total_time);
    }

    Ok((il_output, stats))
}

// Print detailed compilation statistics
fn print_stats(stats: &CompilationStats) {
    println!("\n Compilation Statistics:");
    println!("┌─────────────────────┬───────────┐");
    println!("│ Phase               │ Time (s)  │");
    println!("├─────────────────────┼───────────┤");
    println!("│ Parsing             │ {:>8.3} │", stats.parser_time);
    println!("│ Type Annotation     │ {:>8.3} │", stats.typecheck_time);
    println!("│ Code Generation     │ {:>8.3} │", stats.codegen_time);
    println!("├─────────────────────┼───────────┤");
    println!("│ Total Time          │ {:>8.3} │", stats.total_time);
    println!("└─────────────────────┴───────────┘");

    println!("\n Code Metrics:");
    println!("  • Source Lines:       {}", stats.source_lines);
    println!("  • IL Lines:           {}", stats.il_lines);
}

fn main() {
    let args = Cli::parse();

    match compile(&args.path, &args) {
        Ok((output, stats)) => {
            let output_path = determine_output_path(&args.path, &args.output);

            if let Err(e) = fs::write(&output_path, &output) {
                fatal(&format!("Failed to write output file '{}': {}", output_path.display(), e));
            }

            if args.verbose {
                println!("IL written to: {}", output_path.display());
            }

            if args.timing {
                print_stats(&stats);
            }

            if args.verbose {
                println!("Compilation successful!");
            }
        }
        Err(e) => match e.diagnostic() {
            Some(diagnostic) => {
                eprintln!("{}", diagnostic.excerpt());
                fatal(&diagnostic.to_string())
            }
            None => fatal(&format!("Compilation failed: {}", e)),
        },
    }
}
