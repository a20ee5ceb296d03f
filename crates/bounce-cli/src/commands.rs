//! Resource subcommands. Each one makes its API calls through the shared
//! `ApiClient` and turns the response status into output or a message.

use anyhow::Result;
use bounce_core::api::ApiResponse;
use bounce_core::models::{
    Club, ClubSearchResults, ClubUpdate, Membership, NewClub, NewUser, User, UserUpdate,
};
use clap::{Args, Subcommand};
use serde_json::Value;

use crate::app::{expect_success, App};
use crate::messages::Action;

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Show a user's profile
    Show { username: String },
    /// Create an account (prompts for the password)
    Create {
        username: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
    },
    /// Change a user's name or email; omitted fields are left alone
    Update {
        username: String,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Delete a user
    Delete { username: String },
}

#[derive(Debug, Args)]
pub struct ClubFields {
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
    #[arg(long)]
    pub facebook: Option<String>,
    #[arg(long)]
    pub instagram: Option<String>,
    #[arg(long)]
    pub twitter: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ClubCommand {
    /// Show a club and its members
    Show { name: String },
    /// Create a club
    Create {
        name: String,
        #[command(flatten)]
        fields: ClubFields,
    },
    /// Update a club; omitted fields are left alone
    Update {
        name: String,
        /// Rename the club
        #[arg(long = "rename")]
        new_name: Option<String>,
        #[command(flatten)]
        fields: ClubFields,
    },
    /// Delete a club
    Delete { name: String },
    /// Search clubs by name and description
    Search { query: String },
}

#[derive(Debug, Args)]
pub struct MemberFilter {
    /// Limit to this user id
    #[arg(long, conflicts_with = "mine")]
    pub user_id: Option<String>,
    /// Limit to the signed-in user
    #[arg(long)]
    pub mine: bool,
}

#[derive(Debug, Subcommand)]
pub enum MembershipCommand {
    /// List a club's memberships
    List {
        club: String,
        #[command(flatten)]
        filter: MemberFilter,
    },
    /// Join a club, or add another user to it
    Add {
        club: String,
        #[command(flatten)]
        filter: MemberFilter,
    },
    /// Remove memberships; without a filter every membership of the club goes
    Remove {
        club: String,
        #[command(flatten)]
        filter: MemberFilter,
    },
}

fn print_json(response: &ApiResponse) {
    match response.json::<Value>() {
        Ok(value) => println!(
            "{}",
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| response.text())
        ),
        Err(_) if response.body().is_empty() => {}
        Err(_) => println!("{}", response.text()),
    }
}

fn print_user(user: &User) {
    println!("{} ({})", user.full_name, user.username);
    println!("  Email: {}", user.email);
    if !user.bio.is_empty() {
        println!("  Bio:   {}", user.bio);
    }
    if let Some(created) = user.created_at_utc() {
        println!("  Joined {}", created.format("%b %d, %Y"));
    }
}

fn print_club(club: &Club) {
    println!("{}", club.name);
    if !club.description.is_empty() {
        println!("  {}", club.description);
    }
    for (label, url) in club.links() {
        println!("  {:<10} {}", label, url);
    }
}

fn print_memberships(memberships: &[Membership]) {
    if memberships.is_empty() {
        println!("No members");
        return;
    }
    for m in memberships {
        let joined = m
            .joined_at()
            .map(|d| d.format("%b %d, %Y").to_string())
            .unwrap_or_default();
        println!("  {:<20} {:<24} {}", m.username, m.full_name, joined);
    }
}

impl ClubFields {
    fn into_new_club(self, name: String) -> NewClub {
        NewClub {
            name,
            description: self.description.unwrap_or_default(),
            website_url: self.website.unwrap_or_default(),
            facebook_url: self.facebook.unwrap_or_default(),
            instagram_url: self.instagram.unwrap_or_default(),
            twitter_url: self.twitter.unwrap_or_default(),
        }
    }

    fn into_update(self, new_name: Option<String>) -> ClubUpdate {
        ClubUpdate {
            name: new_name,
            description: self.description,
            website_url: self.website,
            facebook_url: self.facebook,
            instagram_url: self.instagram,
            twitter_url: self.twitter,
        }
    }
}

pub async fn run_user(app: &App, command: UserCommand) -> Result<()> {
    match command {
        UserCommand::Show { username } => {
            let response = app.api.get_user(&username).await?;
            let response = expect_success(response, Action::Lookup("user"))?;
            match response.json::<User>() {
                Ok(user) => print_user(&user),
                Err(_) => print_json(&response),
            }
        }
        UserCommand::Create {
            username,
            full_name,
            email,
        } => {
            let password = App::prompt_new_password()?;
            let user = NewUser {
                full_name,
                username,
                password,
                email,
            };
            let response = app.api.create_user(&user).await?;
            expect_success(response, Action::CreateAccount)?;
            println!("Created account {}. Run `bounce login {}` to sign in.", user.username, user.username);
        }
        UserCommand::Update {
            username,
            full_name,
            email,
        } => {
            app.require_sign_in()?;
            let update = UserUpdate { full_name, email };
            if update.is_empty() {
                println!("Nothing to update");
                return Ok(());
            }
            let response = app.api.update_user(&username, &update).await?;
            let response = expect_success(response, Action::EditAccount)?;
            print_json(&response);
        }
        UserCommand::Delete { username } => {
            app.require_sign_in()?;
            let response = app.api.delete_user(&username).await?;
            expect_success(response, Action::EditAccount)?;
            println!("Deleted user {}", username);
        }
    }
    Ok(())
}

pub async fn run_club(app: &App, command: ClubCommand) -> Result<()> {
    match command {
        ClubCommand::Show { name } => {
            let user_id = app.api.user_id_from_token();
            let (club, memberships) = futures::join!(
                app.api.get_club(&name),
                app.api.get_memberships(&name, user_id.as_deref())
            );

            let club = expect_success(club?, Action::Lookup("club"))?;
            match club.json::<Club>() {
                Ok(club) => print_club(&club),
                Err(_) => print_json(&club),
            }

            // A missing membership list just means nobody has joined
            let memberships = memberships?;
            if memberships.status().as_u16() != 404 {
                let memberships = expect_success(memberships, Action::Membership)?;
                println!("Members:");
                print_memberships(&memberships.json::<Vec<Membership>>()?);
            }
        }
        ClubCommand::Create { name, fields } => {
            app.require_sign_in()?;
            let club = fields.into_new_club(name);
            let response = app.api.create_club(&club).await?;
            expect_success(response, Action::CreateClub)?;
            println!("Created club {}", club.name);
        }
        ClubCommand::Update {
            name,
            new_name,
            fields,
        } => {
            app.require_sign_in()?;
            let update = fields.into_update(new_name);
            let response = app.api.update_club(&name, &update).await?;
            let response = expect_success(response, Action::EditClub)?;
            match response.json::<Club>() {
                Ok(club) => print_club(&club),
                Err(_) => print_json(&response),
            }
        }
        ClubCommand::Delete { name } => {
            app.require_sign_in()?;
            let response = app.api.delete_club(&name).await?;
            expect_success(response, Action::EditClub)?;
            println!("Deleted club {}", name);
        }
        ClubCommand::Search { query } => {
            let response = app.api.search_clubs(&query).await?;
            let response = expect_success(response, Action::Lookup("club"))?;
            let results: ClubSearchResults = response.json()?;
            if results.results.is_empty() {
                println!("No clubs match \"{}\"", query);
            }
            for club in &results.results {
                print_club(club);
            }
            if results.total_pages > 1 {
                println!("(page {} of {})", results.page + 1, results.total_pages);
            }
        }
    }
    Ok(())
}

pub async fn run_membership(app: &App, command: MembershipCommand) -> Result<()> {
    match command {
        MembershipCommand::List { club, filter } => {
            let user_id = app.resolve_user_id(filter.user_id, filter.mine)?;
            let response = app.api.get_memberships(&club, user_id.as_deref()).await?;
            let response = expect_success(response, Action::Membership)?;
            print_memberships(&response.json::<Vec<Membership>>()?);
        }
        MembershipCommand::Add { club, filter } => {
            let user_id = app.resolve_user_id(filter.user_id, true)?;
            let Some(user_id) = user_id else {
                anyhow::bail!("No user id to add");
            };
            let response = app.api.add_membership(&club, &user_id).await?;
            expect_success(response, Action::Membership)?;
            println!("Added user {} to {}", user_id, club);
        }
        MembershipCommand::Remove { club, filter } => {
            app.require_sign_in()?;
            let user_id = app.resolve_user_id(filter.user_id, filter.mine)?;
            let response = app.api.delete_memberships(&club, user_id.as_deref()).await?;
            expect_success(response, Action::Membership)?;
            match user_id {
                Some(id) => println!("Removed user {} from {}", id, club),
                None => println!("Removed all memberships of {}", club),
            }
        }
    }
    Ok(())
}
