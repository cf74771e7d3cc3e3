//! Interactive shopping shell.
//!
//! Reads one command per line, applies it to the storefront and prints the
//! result. Shopper mistakes (bad input, not logged in, incomplete payment
//! details) are printed and the shell keeps going; only terminal I/O errors
//! end it.

use std::io::Write;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::warn;

use scoder_core::ProductId;
use scoder_storefront::catalog::CatalogLoad;
use scoder_storefront::services::{
    CheckoutError, CheckoutForm, LoginForm, PaymentMethod, RegisterForm,
};
use scoder_storefront::store::{Action, Dispatch};
use scoder_storefront::{AppError, Storefront};

use super::account::write_user;
use super::{CliError, render_cart, render_catalog, render_confirmation, user_message};

/// One shell line; the first word names the command.
#[derive(Debug, Parser)]
#[command(multicall = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

/// Shell commands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ShellCommand {
    /// Show products matching the current search
    #[command(visible_alias = "ls")]
    List,
    /// Filter products by title or category (no text clears the search)
    Search {
        /// Text to look for, used exactly as typed
        #[arg(allow_hyphen_values = true)]
        query: Option<String>,
    },
    /// Add one unit to the cart (requires login)
    Add { id: ProductId },
    /// Add one more unit of a product in the cart
    #[command(name = "inc")]
    Increment { id: ProductId },
    /// Remove one unit of a product in the cart
    #[command(name = "dec")]
    Decrement { id: ProductId },
    /// Set a cart quantity (0 or less removes the product)
    #[command(name = "qty")]
    Quantity {
        id: ProductId,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product from the cart
    #[command(visible_alias = "rm")]
    Remove { id: ProductId },
    /// Show the cart
    Cart,
    /// Empty the cart
    Clear,
    /// Pay for the cart: credit, debit, pix or boleto
    Checkout {
        #[arg(default_value_t = PaymentMethod::Credit)]
        method: PaymentMethod,
    },
    /// Log in with any well-formed email and a 6+ character password
    Login { email: String, password: String },
    /// Create an account
    Register {
        name: String,
        email: String,
        password: String,
        #[arg(value_name = "CONFIRM")]
        confirm_password: String,
    },
    /// Log out and empty the cart
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Leave the shell
    #[command(visible_alias = "exit")]
    Quit,
}

impl ShellCommand {
    /// Parse one input line. Blank lines parse to `None`.
    ///
    /// # Errors
    ///
    /// Returns clap's error for unknown commands and malformed arguments,
    /// and for `help`, whose rendered text is the command list.
    pub fn parse(line: &str) -> Result<Option<Self>, clap::Error> {
        let words = split_line(line);
        if words.is_empty() {
            return Ok(None);
        }
        ShellLine::try_parse_from(words).map(|parsed| Some(parsed.command))
    }
}

/// Split a line into words. The command word is matched case-insensitively
/// and everything after `search ` is passed on untouched as the query.
fn split_line(line: &str) -> Vec<String> {
    let line = line.trim_start();
    let (command, rest) = line
        .split_once(char::is_whitespace)
        .unwrap_or((line.trim_end(), ""));
    let command = command.to_ascii_lowercase();

    if command.is_empty() {
        return Vec::new();
    }
    if command == "search" {
        return if rest.is_empty() {
            vec![command]
        } else {
            vec![command, rest.to_string()]
        };
    }

    std::iter::once(command)
        .chain(rest.split_whitespace().map(str::to_string))
        .collect()
}

// =============================================================================
// Session loop
// =============================================================================

/// Run the shell until `quit` or end of input.
///
/// # Errors
///
/// Returns an error only if reading input or writing output fails.
pub async fn run<R, W>(storefront: &Storefront, input: R, out: &mut W) -> Result<(), CliError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    writeln!(out, "Scoder Store - type help for commands")?;
    if let Some(user) = storefront.restore_session() {
        writeln!(out, "Logged in as {}", user.name)?;
    }
    if let CatalogLoad::Failed(message) = storefront.load_catalog().await {
        writeln!(out, "Could not load products: {message}")?;
    }

    loop {
        write!(out, "scoder> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        let command = match ShellCommand::parse(&line) {
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                write!(out, "{}", e.render())?;
                continue;
            }
        };

        match execute(storefront, command, &mut lines, out).await {
            Ok(()) => {}
            Err(CliError::App(e)) => {
                if !e.is_user_facing() {
                    warn!(error = %e, "Shell command failed");
                }
                writeln!(out, "{}", user_message(&e))?;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

async fn execute<R, W>(
    storefront: &Storefront,
    command: ShellCommand,
    lines: &mut Lines<R>,
    out: &mut W,
) -> Result<(), CliError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let cart = storefront.cart();

    match command {
        ShellCommand::Quit => {}
        ShellCommand::List => {
            storefront.load_catalog().await;
            render_catalog(out, &storefront.catalog_view())?;
        }
        ShellCommand::Search { query } => {
            storefront
                .store()
                .dispatch(Action::SetSearchQuery(query.unwrap_or_default()));
            render_catalog(out, &storefront.catalog_view())?;
        }
        ShellCommand::Add { id } => {
            cart.add(id)?;
            let view = storefront.cart_view();
            writeln!(out, "Added to cart ({} in cart)", view.item_count)?;
        }
        ShellCommand::Increment { id } => report_edit(out, cart.increment(id), storefront)?,
        ShellCommand::Decrement { id } => report_edit(out, cart.decrement(id), storefront)?,
        ShellCommand::Quantity { id, quantity } => {
            report_edit(out, cart.set_quantity(id, quantity), storefront)?;
        }
        ShellCommand::Remove { id } => report_edit(out, cart.remove(id), storefront)?,
        ShellCommand::Cart => render_cart(out, &storefront.cart_view())?,
        ShellCommand::Clear => {
            cart.clear();
            render_cart(out, &storefront.cart_view())?;
        }
        ShellCommand::Checkout { method } => {
            if storefront.cart_view().is_empty() {
                return Err(AppError::from(CheckoutError::EmptyCart).into());
            }
            let form = read_payment_form(method, lines, out).await?;
            writeln!(out, "Processing payment...")?;
            let order = storefront
                .checkout()
                .checkout(&form)
                .await
                .map_err(AppError::from)?;
            render_confirmation(out, &order)?;
        }
        ShellCommand::Login { email, password } => {
            let form = LoginForm { email, password };
            let user = storefront
                .auth()
                .login(&form)
                .await
                .map_err(AppError::from)?;
            writeln!(out, "Welcome back, {}!", user.name)?;
        }
        ShellCommand::Register {
            name,
            email,
            password,
            confirm_password,
        } => {
            let form = RegisterForm {
                name,
                email,
                password,
                confirm_password,
            };
            let user = storefront
                .auth()
                .register(&form)
                .await
                .map_err(AppError::from)?;
            writeln!(out, "Account created. Welcome, {}!", user.name)?;
        }
        ShellCommand::Logout => {
            storefront.auth().logout();
            writeln!(out, "Logged out")?;
        }
        ShellCommand::Whoami => match storefront.store().state().user {
            Some(user) => write_user(out, &user)?,
            None => writeln!(out, "Not logged in")?,
        },
    }
    Ok(())
}

fn report_edit(
    out: &mut impl Write,
    outcome: Dispatch,
    storefront: &Storefront,
) -> Result<(), CliError> {
    if outcome.is_changed() {
        render_cart(out, &storefront.cart_view())?;
    } else {
        writeln!(out, "That product is not in your cart")?;
    }
    Ok(())
}

/// Prompt for the fields `method` needs. Empty answers are left unset.
async fn read_payment_form<R, W>(
    method: PaymentMethod,
    lines: &mut Lines<R>,
    out: &mut W,
) -> Result<CheckoutForm, CliError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut form = CheckoutForm {
        payment_method: method,
        ..CheckoutForm::default()
    };

    if method.uses_card() {
        form.card_number = prompt(lines, out, "Card number").await?;
        form.card_name = prompt(lines, out, "Name on card").await?;
        form.card_expiry = prompt(lines, out, "Expiry (MM/YY)").await?;
        form.card_cvv = prompt(lines, out, "CVV").await?;
    } else if method == PaymentMethod::Pix {
        form.pix_key = prompt(lines, out, "PIX key").await?;
    }
    Ok(form)
}

async fn prompt<R, W>(
    lines: &mut Lines<R>,
    out: &mut W,
    label: &str,
) -> Result<Option<String>, CliError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write!(out, "{label}: ")?;
    out.flush()?;
    let answer = lines.next_line().await?;
    Ok(answer
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use clap::error::ErrorKind;
    use scoder_storefront::catalog::{Product, Rating};
    use scoder_storefront::config::StorefrontConfig;
    use scoder_storefront::session::MemoryStore;

    use super::*;

    fn storefront() -> Storefront {
        let config = StorefrontConfig::from_lookup(|key| {
            (key == "SCODER_CATALOG_URL").then(|| "http://127.0.0.1:9/products".to_string())
        })
        .unwrap()
        .without_delays();
        let storefront = Storefront::new(config, Arc::new(MemoryStore::new())).unwrap();

        let backpack = Product {
            id: ProductId::new(1),
            title: "Fjallraven Backpack".to_string(),
            price: "109.95".parse().unwrap(),
            description: String::new(),
            category: "men's clothing".to_string(),
            image: None,
            rating: Rating {
                rate: 3.9,
                count: 120,
            },
        };
        storefront
            .store()
            .dispatch(Action::SetProducts(vec![backpack]));
        storefront
    }

    async fn run_script(storefront: &Storefront, script: &str) -> String {
        let mut out = Vec::new();
        run(storefront, script.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    fn parsed(line: &str) -> ShellCommand {
        ShellCommand::parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert!(ShellCommand::parse("  ").unwrap().is_none());
        assert_eq!(
            parsed("add 3"),
            ShellCommand::Add {
                id: ProductId::new(3)
            }
        );
        assert_eq!(
            parsed("qty 3 -1"),
            ShellCommand::Quantity {
                id: ProductId::new(3),
                quantity: -1
            }
        );
        assert_eq!(
            parsed("checkout PIX"),
            ShellCommand::Checkout {
                method: PaymentMethod::Pix
            }
        );
        assert_eq!(
            parsed("checkout"),
            ShellCommand::Checkout {
                method: PaymentMethod::Credit
            }
        );
        assert_eq!(parsed("ls"), ShellCommand::List);
        assert_eq!(parsed("EXIT"), ShellCommand::Quit);
    }

    #[test]
    fn test_search_query_is_kept_as_typed() {
        assert_eq!(
            parsed("search Men's Clothing"),
            ShellCommand::Search {
                query: Some("Men's Clothing".to_string())
            }
        );
        assert_eq!(
            parsed("search  ring "),
            ShellCommand::Search {
                query: Some(" ring ".to_string())
            }
        );
        assert_eq!(
            parsed("search -50% off"),
            ShellCommand::Search {
                query: Some("-50% off".to_string())
            }
        );
        assert_eq!(parsed("search"), ShellCommand::Search { query: None });
    }

    #[test]
    fn test_parse_errors() {
        let kind = |line: &str| ShellCommand::parse(line).unwrap_err().kind();

        assert_eq!(kind("add"), ErrorKind::MissingRequiredArgument);
        assert_eq!(kind("add shoe"), ErrorKind::ValueValidation);
        assert_eq!(kind("checkout cash"), ErrorKind::ValueValidation);
        assert_eq!(kind("cart now"), ErrorKind::UnknownArgument);

        let unknown = ShellCommand::parse("dance").unwrap_err();
        assert!(unknown.render().to_string().contains("dance"));
    }

    #[test]
    fn test_help_lists_commands() {
        let help = ShellCommand::parse("help").unwrap_err();
        assert_eq!(help.kind(), ErrorKind::DisplayHelp);

        let text = help.render().to_string();
        for command in ["search", "add", "qty", "checkout", "register", "quit"] {
            assert!(text.contains(command), "missing {command} in help");
        }
    }

    #[tokio::test]
    async fn test_guest_cannot_add() {
        let storefront = storefront();
        let output = run_script(&storefront, "add 1\nquit\n").await;

        assert!(output.contains("Please login to add items to cart"));
        assert!(storefront.store().state().cart.is_empty());
    }

    #[tokio::test]
    async fn test_shopping_session() {
        let storefront = storefront();
        let script = "\
login jane@example.com secret1
add 1
inc 1
cart
checkout pix

checkout pix
jane@pix.example
";
        let output = run_script(&storefront, script).await;

        assert!(output.contains("Welcome back, jane!"));
        assert!(output.contains("Added to cart (1 in cart)"));
        assert!(output.contains("1 item(s) in your cart"));
        assert!(output.contains("$109.95 x 2 = $219.90"));
        assert!(output.contains("Please fill in all required payment details"));
        assert!(output.contains("Order Complete!"));
        assert!(output.contains("$219.90 paid by PIX"));
        assert!(storefront.store().state().cart.is_empty());
    }

    #[tokio::test]
    async fn test_search_and_missing_cart_entries() {
        let storefront = storefront();
        let output = run_script(&storefront, "search shoes\nsearch MEN\nremove 1\nhelp\n").await;

        assert!(output.contains("No products match \"shoes\""));
        assert!(output.contains("Fjallraven Backpack"));
        assert!(output.contains("That product is not in your cart"));
        assert!(output.contains("Pay for the cart"));
    }

    #[tokio::test]
    async fn test_checkout_with_empty_cart_does_not_prompt() {
        let storefront = storefront();
        let output = run_script(&storefront, "checkout
whoami
").await;

        assert!(output.contains("Your cart is empty"));
        assert!(!output.contains("Card number"));
        assert!(output.contains("Not logged in"));
    }
}
