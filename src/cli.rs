use dialoguer::{Confirm, Input, Password};
use sitedesk::config::{default_config_path, Config};
use sitedesk::error::{DeskError, Result};
use sitedesk::helpers::format_remaining;
use sitedesk::protocol::api::{CreateCareerRequest, GalleryImageFields, TeamMemberFields};
use sitedesk::transport::FilePart;
use sitedesk::{
    ApplicationService, AuthService, CareerService, CodeService, GalleryService, HttpClient,
    MessageService, TeamService,
};
use std::path::PathBuf;

use crate::ui::{truncate, UI};
use crate::{
    AddImageArgs, AddMemberArgs, ApplicationsCommand, CareersCommand, CodesCommand, Commands,
    ConfigCommand, CreateCareerArgs, GalleryCommand, LoginArgs, MessagesCommand, RemoveArgs,
    TeamCommand,
};

/// CLI handler for processing commands
pub struct CliHandler {
    config_path: Option<PathBuf>,
    ui: UI,
}

impl CliHandler {
    pub fn with_config_path(config_path: Option<PathBuf>) -> Self {
        Self {
            config_path,
            ui: UI::new(),
        }
    }

    fn load_config(&self) -> Result<Config> {
        match &self.config_path {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }

    /// Log filter from `--verbose` and the configured `verbose` setting.
    /// Config load errors surface later from the command itself.
    pub fn log_filter(&self, verbose_flag: bool) -> String {
        self.load_config()
            .unwrap_or_default()
            .log_filter(verbose_flag)
    }

    fn config_file(&self) -> PathBuf {
        self.config_path.clone().unwrap_or_else(default_config_path)
    }

    fn client(&self) -> Result<HttpClient> {
        HttpClient::new(self.load_config()?)
    }

    pub async fn execute(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Login(args) => self.handle_login(args).await,
            Commands::Logout => self.handle_logout(),
            Commands::Status => self.handle_status(),
            Commands::Careers { command } => self.handle_careers(command).await,
            Commands::Applications { command } => self.handle_applications(command).await,
            Commands::Messages { command } => self.handle_messages(command).await,
            Commands::Team { command } => self.handle_team(command).await,
            Commands::Gallery { command } => self.handle_gallery(command).await,
            Commands::Codes { command } => self.handle_codes(command).await,
            Commands::Config { command } => self.handle_config(command).await,
        }
    }

    /// Print an error with a hint where one helps
    pub fn report(&self, error: &DeskError) {
        self.ui.error(&format!("Error: {}", error));
        if error.is_auth_error() {
            self.ui.info("Run `sitedesk login` to start a new session");
        } else if error.is_network_error() && error.status().is_none() {
            self.ui
                .info("Check the backend address with `sitedesk config show`");
        }
    }

    async fn handle_login(&mut self, args: LoginArgs) -> Result<()> {
        let client = self.client()?;
        let username = match args.username {
            Some(username) => username,
            None => Input::<String>::new().with_prompt("Username").interact_text()?,
        };
        let password = Password::new().with_prompt("Password").interact()?;

        let login = AuthService::new(&client).login(&username, &password).await?;
        self.ui.success(&format!("Logged in as {}", login.username));
        Ok(())
    }

    fn handle_logout(&mut self) -> Result<()> {
        let client = self.client()?;
        AuthService::new(&client).logout();
        self.ui.success("Logged out");
        Ok(())
    }

    fn handle_status(&mut self) -> Result<()> {
        let client = self.client()?;
        let status = AuthService::new(&client).status();

        let mut rows = vec![
            ("Server", client.config().base_url.clone()),
            (
                "Authentication",
                self.ui.format_auth_status(status.is_authenticated()),
            ),
        ];
        if let Some(user) = &status.user {
            rows.push(("Username", user.username.clone()));
            rows.push(("User ID", user.user_id.to_string()));
            rows.push(("Session expires in", format_remaining(status.remaining_ms)));
        }
        rows.push((
            "Sliding session",
            self.ui
                .format_flag(client.config().sliding_session, "on", "off"),
        ));

        self.ui.card("Status", rows);
        Ok(())
    }

    async fn handle_careers(&mut self, command: CareersCommand) -> Result<()> {
        let client = self.client()?;
        let service = CareerService::new(&client);

        match command {
            CareersCommand::List => {
                let careers = service.list().await?.into_data()?;
                if careers.is_empty() {
                    self.ui.info("No job openings");
                    return Ok(());
                }
                let rows = careers
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.to_string(),
                            truncate(&c.title, 40),
                            c.location.clone(),
                            c.employment_type.clone(),
                            self.ui.format_flag(c.is_active, "active", "hidden"),
                        ]
                    })
                    .collect();
                self.ui
                    .table(&["ID", "Title", "Location", "Type", "Status"], rows);
            }
            CareersCommand::Create(args) => {
                let career = service
                    .create(&career_request(args))
                    .await?
                    .into_data()?;
                self.ui
                    .success(&format!("Created opening #{}: {}", career.id, career.title));
            }
            CareersCommand::Delete(args) => {
                if !self.confirm(&args, "job opening")? {
                    return Ok(());
                }
                service.delete(args.id).await?.into_result()?;
                self.ui.success(&format!("Deleted opening #{}", args.id));
            }
        }
        Ok(())
    }

    async fn handle_applications(&mut self, command: ApplicationsCommand) -> Result<()> {
        let client = self.client()?;
        let service = ApplicationService::new(&client);

        match command {
            ApplicationsCommand::List(page) => {
                let response = service.list(page.page).await?.into_result()?;
                let applications = response.data.clone().unwrap_or_default();
                let rows = applications
                    .iter()
                    .map(|a| {
                        vec![
                            a.id.to_string(),
                            a.full_name.clone(),
                            a.email.clone(),
                            a.career_title
                                .clone()
                                .or_else(|| a.career.map(|id| format!("#{}", id)))
                                .unwrap_or_else(|| "-".to_string()),
                            a.applied_at
                                .map(|t| t.format("%Y-%m-%d").to_string())
                                .unwrap_or_else(|| "-".to_string()),
                        ]
                    })
                    .collect();
                self.ui
                    .table(&["ID", "Name", "Email", "Position", "Applied"], rows);
                self.ui.pagination(
                    response.count,
                    applications.len(),
                    response.next.as_deref(),
                );
            }
        }
        Ok(())
    }

    async fn handle_messages(&mut self, command: MessagesCommand) -> Result<()> {
        let client = self.client()?;
        let service = MessageService::new(&client);

        match command {
            MessagesCommand::List(page) => {
                let response = service.list(page.page).await?.into_result()?;
                let messages = response.data.clone().unwrap_or_default();
                let rows = messages
                    .iter()
                    .map(|m| {
                        vec![
                            m.id.to_string(),
                            m.name.clone(),
                            truncate(m.subject.as_deref().unwrap_or("-"), 30),
                            self.ui.format_flag(!m.is_read, "new", "read"),
                        ]
                    })
                    .collect();
                self.ui.table(&["ID", "From", "Subject", ""], rows);
                self.ui
                    .pagination(response.count, messages.len(), response.next.as_deref());
            }
            MessagesCommand::Show { id } => {
                let message = service.get(id).await?.into_data()?;
                self.ui.card(
                    &format!("Message #{}", message.id),
                    vec![
                        ("From", format!("{} <{}>", message.name, message.email)),
                        ("Subject", message.subject.clone().unwrap_or_default()),
                        (
                            "Received",
                            message
                                .created_at
                                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                                .unwrap_or_else(|| "-".to_string()),
                        ),
                    ],
                );
                println!("{}", message.message);
            }
        }
        Ok(())
    }

    async fn handle_team(&mut self, command: TeamCommand) -> Result<()> {
        let client = self.client()?;
        let service = TeamService::new(&client);

        match command {
            TeamCommand::List => {
                let mut members = service.list().await?.into_data()?;
                members.sort_by_key(|m| m.order.unwrap_or(i32::MAX));
                let rows = members
                    .iter()
                    .map(|m| vec![m.id.to_string(), m.name.clone(), m.role.clone()])
                    .collect();
                self.ui.table(&["ID", "Name", "Role"], rows);
            }
            TeamCommand::Add(args) => {
                let (fields, image) = member_fields(args).await?;
                let member = service.create(&fields, image).await?.into_data()?;
                self.ui
                    .success(&format!("Added {} (#{})", member.name, member.id));
            }
            TeamCommand::Remove(args) => {
                if !self.confirm(&args, "team member")? {
                    return Ok(());
                }
                service.delete(args.id).await?.into_result()?;
                self.ui.success(&format!("Removed team member #{}", args.id));
            }
        }
        Ok(())
    }

    async fn handle_gallery(&mut self, command: GalleryCommand) -> Result<()> {
        let client = self.client()?;
        let service = GalleryService::new(&client);

        match command {
            GalleryCommand::List { category } => {
                let images = service.list(category.as_deref()).await?.into_data()?;
                let rows = images
                    .iter()
                    .map(|i| {
                        vec![
                            i.id.to_string(),
                            truncate(&i.title, 40),
                            i.category.clone().unwrap_or_else(|| "-".to_string()),
                        ]
                    })
                    .collect();
                self.ui.table(&["ID", "Title", "Category"], rows);
            }
            GalleryCommand::Categories => {
                let rows = service
                    .categories()
                    .await?
                    .into_iter()
                    .map(|c| vec![c.name, c.image_count.to_string()])
                    .collect();
                self.ui.table(&["Category", "Images"], rows);
            }
            GalleryCommand::Add(args) => {
                let (fields, image) = image_fields(args).await?;
                let created = service.create(&fields, image).await?.into_data()?;
                self.ui
                    .success(&format!("Uploaded {} (#{})", created.title, created.id));
            }
            GalleryCommand::Remove(args) => {
                if !self.confirm(&args, "gallery image")? {
                    return Ok(());
                }
                service.delete(args.id).await?.into_result()?;
                self.ui.success(&format!("Removed image #{}", args.id));
            }
        }
        Ok(())
    }

    async fn handle_codes(&mut self, command: CodesCommand) -> Result<()> {
        let client = self.client()?;
        let service = CodeService::new(&client);

        match command {
            CodesCommand::Generate { count } => {
                let codes = service.generate(count).await?.into_data()?;
                self.ui.success(&format!("Generated {} code(s)", codes.len()));
                for code in codes {
                    println!("{}", code.code);
                }
            }
            CodesCommand::List => {
                let response = service.list().await?;
                // an empty pool is reported with success: false
                if !response.success {
                    self.ui.warning(&response.message);
                    return Ok(());
                }
                let rows = response
                    .data
                    .unwrap_or_default()
                    .into_iter()
                    .map(|c| {
                        vec![
                            c.code,
                            self.ui.format_flag(!c.is_used, "available", "used"),
                        ]
                    })
                    .collect();
                self.ui.table(&["Code", "Status"], rows);
            }
            CodesCommand::Redeem { code } => {
                let response = service.redeem(&code).await?.into_result()?;
                let message = if response.message.is_empty() {
                    "Code redeemed".to_string()
                } else {
                    response.message
                };
                self.ui.success(&message);
            }
        }
        Ok(())
    }

    async fn handle_config(&mut self, command: ConfigCommand) -> Result<()> {
        let path = self.config_file();

        match command {
            ConfigCommand::Show => {
                let config = self.load_config()?;
                self.ui.card(
                    "Configuration",
                    vec![
                        ("File", path.display().to_string()),
                        ("Base URL", config.base_url.clone()),
                        (
                            "Timeout",
                            if config.timeout == 0 {
                                "none".to_string()
                            } else {
                                format!("{}s", config.timeout)
                            },
                        ),
                        ("Use proxy", config.use_proxy.to_string()),
                        ("Sliding session", config.sliding_session.to_string()),
                        ("Storage", config.storage_dir.display().to_string()),
                    ],
                );
            }
            ConfigCommand::SetUrl { url } => {
                let mut config = self.load_config()?;
                config.base_url = url.trim().trim_end_matches('/').to_string();
                config.validate()?;
                config.save(&path).await?;
                self.ui.success(&format!("Base URL set to {}", config.base_url));
            }
            ConfigCommand::Reset => {
                Config::default().save(&path).await?;
                self.ui.success("Configuration reset to defaults");
            }
        }
        Ok(())
    }

    fn confirm(&self, args: &RemoveArgs, what: &str) -> Result<bool> {
        if args.force {
            return Ok(true);
        }
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete {} #{}?", what, args.id))
            .default(false)
            .interact()?;
        if !confirmed {
            self.ui.warning("Cancelled");
        }
        Ok(confirmed)
    }
}

fn career_request(args: CreateCareerArgs) -> CreateCareerRequest {
    CreateCareerRequest {
        title: args.title,
        department: args.department,
        location: args.location,
        employment_type: args.employment_type,
        description: args.description,
        requirements: args.requirements,
        is_active: !args.inactive,
    }
}

async fn member_fields(args: AddMemberArgs) -> Result<(TeamMemberFields, Option<FilePart>)> {
    let image = match &args.image {
        Some(path) => Some(FilePart::from_path("image", path).await?),
        None => None,
    };
    let fields = TeamMemberFields {
        name: args.name,
        role: args.role,
        bio: args.bio,
        order: args.order,
    };
    Ok((fields, image))
}

async fn image_fields(args: AddImageArgs) -> Result<(GalleryImageFields, FilePart)> {
    let image = FilePart::from_path("image", &args.image).await?;
    let fields = GalleryImageFields {
        title: args.title,
        description: args.description,
        category: args.category,
    };
    Ok((fields, image))
}
