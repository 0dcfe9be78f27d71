use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use shop_client::{NewProduct, ShopClient};

const DEFAULT_SERVER: &str = "http://127.0.0.1:4000";

#[derive(Parser, Debug)]
struct Cli {
    #[clap(short, long, default_value = DEFAULT_SERVER)]
    server: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum View {
    All,
    New,
    Women,
    Related,
}

#[derive(Subcommand, Debug)]
enum Command {
    Signup {
        #[clap(long)]
        username: String,
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: String,
    },
    Login {
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: String,
    },
    Products {
        #[clap(long, value_enum, default_value_t = View::All)]
        view: View,
    },
    AddProduct {
        #[clap(long)]
        name: String,
        #[clap(long)]
        image: String,
        #[clap(long)]
        category: String,
        #[clap(long)]
        new_price: f64,
        #[clap(long)]
        old_price: f64,
    },
    RemoveProduct {
        id: i64,
        #[clap(long)]
        name: Option<String>,
    },
    Upload {
        path: PathBuf,
    },
    Cart,
    AddToCart {
        item_id: u32,
    },
    RemoveFromCart {
        item_id: u32,
    },
    Subscribe {
        email: String,
    },
    SendNewsletter,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    let mut client = ShopClient::connect(&args.server).await?;

    match args.command {
        Command::Signup {
            username,
            email,
            password,
        } => {
            client.signup(&username, &email, &password).await?;
            println!("Successfully signed up!");
        }
        Command::Login { email, password } => {
            client.login(&email, &password).await?;
            println!("Successfully logged in!");
        }
        Command::Products { view } => {
            let products = match view {
                View::All => client.all_products().await?,
                View::New => client.new_collection().await?,
                View::Women => client.popular_in_women().await?,
                View::Related => client.related_products().await?,
            };
            println!("Products ({})", products.len());
            for product in products {
                println!("- {}", product);
            }
        }
        Command::AddProduct {
            name,
            image,
            category,
            new_price,
            old_price,
        } => {
            let product = client
                .add_product(&NewProduct {
                    name,
                    image,
                    category,
                    new_price,
                    old_price,
                })
                .await?;
            println!("Product added! ID: {}", product.id);
        }
        Command::RemoveProduct { id, name } => {
            client.remove_product(id, name.as_deref()).await?;
            println!("Product removed!");
        }
        Command::Upload { path } => {
            let url = client.upload_image(&path).await?;
            println!("Uploaded: {}", url);
        }
        Command::Cart => {
            let cart = client.get_cart().await?;
            let items: Vec<_> = cart.iter().filter(|(_, qty)| **qty > 0).collect();
            if items.is_empty() {
                println!("Cart is empty");
            }
            for (item, qty) in items {
                println!("- item {}: {}", item, qty);
            }
        }
        Command::AddToCart { item_id } => {
            client.add_to_cart(item_id).await?;
            println!("Added");
        }
        Command::RemoveFromCart { item_id } => {
            client.remove_from_cart(item_id).await?;
            println!("Removed");
        }
        Command::Subscribe { email } => {
            println!("{}", client.subscribe(&email).await?);
        }
        Command::SendNewsletter => {
            println!("{}", client.send_newsletter().await?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_defaults_to_local_port() {
        let cli = Cli::try_parse_from(["shop-cli", "cart"]).unwrap();
        assert_eq!(cli.server, DEFAULT_SERVER);
        assert!(matches!(cli.command, Command::Cart));
    }

    #[test]
    fn products_view_defaults_to_all() {
        let cli = Cli::try_parse_from(["shop-cli", "products"]).unwrap();
        assert!(matches!(cli.command, Command::Products { view: View::All }));

        let cli = Cli::try_parse_from(["shop-cli", "products", "--view", "women"]).unwrap();
        assert!(matches!(cli.command, Command::Products { view: View::Women }));

        assert!(Cli::try_parse_from(["shop-cli", "products", "--view", "kids"]).is_err());
    }

    #[test]
    fn add_product_parses_prices() {
        let cli = Cli::try_parse_from([
            "shop-cli",
            "--server",
            "http://shop.test",
            "add-product",
            "--name",
            "Shirt",
            "--image",
            "http://shop.test/images/p.png",
            "--category",
            "men",
            "--new-price",
            "40",
            "--old-price",
            "59.5",
        ])
        .unwrap();
        assert_eq!(cli.server, "http://shop.test");
        match cli.command {
            Command::AddProduct {
                new_price,
                old_price,
                ..
            } => {
                assert_eq!(new_price, 40.0);
                assert_eq!(old_price, 59.5);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn cart_commands_need_an_item_id() {
        let cli = Cli::try_parse_from(["shop-cli", "add-to-cart", "7"]).unwrap();
        assert!(matches!(cli.command, Command::AddToCart { item_id: 7 }));
        assert!(Cli::try_parse_from(["shop-cli", "remove-from-cart"]).is_err());
        assert!(Cli::try_parse_from(["shop-cli", "add-to-cart", "-1"]).is_err());
    }
}
