use serenity::builder::{CreateEmbed, CreateInteractionResponseMessage, EditInteractionResponse};

/// Discord caps embeds at 25 fields and messages at 10 embeds.
pub const MAX_FIELDS_PER_CARD: usize = 25;
pub const MAX_CARDS_PER_REPLY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: false,
        }
    }

    pub fn inline(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            inline: true,
            ..Self::new(name, value)
        }
    }
}

/// A titled list of fields, rendered as a Discord embed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub fields: Vec<EmbedField>,
}

impl Card {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: EmbedField) -> Self {
        self.fields.push(field);
        self
    }

    /// One card; fields past the cap collapse into a trailing "and N more".
    pub fn capped(title: impl Into<String>, fields: Vec<EmbedField>) -> Card {
        Card {
            title: title.into(),
            fields: cap_fields(fields, MAX_FIELDS_PER_CARD),
        }
    }

    /// Splits fields across as many cards as the field cap requires,
    /// up to the per-reply card limit.
    pub fn paginate(title: &str, fields: Vec<EmbedField>) -> Vec<Card> {
        if fields.is_empty() {
            return vec![Card::new(title)];
        }
        let fields = cap_fields(fields, MAX_FIELDS_PER_CARD * MAX_CARDS_PER_REPLY);
        let pages = fields.len().div_ceil(MAX_FIELDS_PER_CARD);
        fields
            .chunks(MAX_FIELDS_PER_CARD)
            .enumerate()
            .map(|(idx, chunk)| Card {
                title: if pages == 1 {
                    title.to_string()
                } else {
                    format!("{} ({}/{})", title, idx + 1, pages)
                },
                fields: chunk.to_vec(),
            })
            .collect()
    }

    pub fn to_embed(&self) -> CreateEmbed {
        self.fields.iter().fold(
            CreateEmbed::new().title(&self.title),
            |embed, field| {
                // Discord rejects empty field values.
                let value = if field.value.is_empty() { "\u{200b}" } else { field.value.as_str() };
                embed.field(&field.name, value, field.inline)
            },
        )
    }

    /// Plain-text rendering for the console.
    pub fn to_text(&self) -> String {
        let mut body = self.title.clone();
        for field in &self.fields {
            body.push_str(&format!("\n  {}", field.name));
            if !field.value.is_empty() {
                body.push_str(&format!(": {}", field.value.replace('\n', ", ")));
            }
        }
        body
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub content: Option<String>,
    pub cards: Vec<Card>,
    pub ephemeral: bool,
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            ephemeral: true,
            ..Self::text(content)
        }
    }

    pub fn cards(cards: Vec<Card>) -> Self {
        Self {
            cards,
            ..Self::default()
        }
    }

    pub fn to_message(&self) -> CreateInteractionResponseMessage {
        let mut message = CreateInteractionResponseMessage::new().ephemeral(self.ephemeral);
        if let Some(content) = &self.content {
            message = message.content(content);
        }
        if !self.cards.is_empty() {
            message = message.embeds(
                self.cards
                    .iter()
                    .take(MAX_CARDS_PER_REPLY)
                    .map(Card::to_embed)
                    .collect(),
            );
        }
        message
    }

    pub fn to_edit(&self) -> EditInteractionResponse {
        let mut edit = EditInteractionResponse::new();
        if let Some(content) = &self.content {
            edit = edit.content(content);
        }
        edit.embeds(
            self.cards
                .iter()
                .take(MAX_CARDS_PER_REPLY)
                .map(Card::to_embed)
                .collect(),
        )
    }

    pub fn to_text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(content) = &self.content {
            parts.push(content.clone());
        }
        parts.extend(self.cards.iter().map(Card::to_text));
        parts.join("\n")
    }
}

fn cap_fields(mut fields: Vec<EmbedField>, capacity: usize) -> Vec<EmbedField> {
    if fields.len() <= capacity {
        return fields;
    }
    let hidden = fields.len() - (capacity - 1);
    fields.truncate(capacity - 1);
    fields.push(EmbedField::new("More", format!("and {} more not shown", hidden)));
    fields
}
