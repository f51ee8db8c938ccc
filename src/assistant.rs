//! The study assistant. Messages go to an OpenAI-compatible chat endpoint
//! when one is configured, otherwise they are answered from a small table of
//! keyword-matched topics.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::LlmConfig;

const SYSTEM_PROMPT: &str = "Você é um assistente de estudos para o Exame da OAB. \
Responda de forma objetiva, em português, com foco em planejamento, revisão e resolução de questões.";

const FALLBACK_REPLY: &str = "Posso ajudar com o seu cronograma, revisões, simulados e acompanhamento \
do progresso. Sobre qual desses temas você quer falar?";

struct Topic {
    keywords: &'static [&'static str],
    reply: &'static str,
}

const TOPICS: &[Topic] = &[
    Topic {
        keywords: &["cronograma", "agenda", "planejamento", "plano", "schedule"],
        reply: "Gere o cronograma informando suas horas semanais e o nível de domínio de cada \
disciplina. As matérias com menor domínio recebem mais sessões de estudo por semana.",
    },
    Topic {
        keywords: &["revisão", "revisao", "revisar", "review"],
        reply: "Cada sessão de estudo gera revisões curtas em D+1, D+3 e D+7. Marque-as como \
concluídas para manter a repetição espaçada em dia.",
    },
    Topic {
        keywords: &["simulado", "prova", "mock"],
        reply: "Os simulados aparecem a cada 1, 2 ou 3 semanas conforme o modelo escolhido \
(intensivo, equilibrado ou leve). Faça-os em condições de prova, com 3 horas cronometradas.",
    },
    Topic {
        keywords: &["progresso", "desempenho", "acerto", "progress"],
        reply: "Acompanhe a adesão ao cronograma e a taxa de acertos por disciplina no relatório \
de progresso. Priorize as disciplinas com menor aproveitamento nas próximas semanas.",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    Llm,
    Template,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistantReply {
    pub reply: String,
    pub source: ReplySource,
}

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("llm request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("llm responded with {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("llm response had no choices")]
    EmptyReply,
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Clone)]
pub struct Assistant {
    client: Client,
    llm: Option<LlmConfig>,
}

impl Assistant {
    pub fn new(llm: Option<LlmConfig>) -> Result<Self, AssistantError> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self { client, llm })
    }

    pub async fn reply(&self, message: &str) -> Result<AssistantReply, AssistantError> {
        let Some(llm) = &self.llm else {
            return Ok(AssistantReply {
                reply: canned_reply(message).to_string(),
                source: ReplySource::Template,
            });
        };

        let body = json!({
            "model": llm.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": message },
            ],
            "stream": false,
        });

        tracing::debug!("forwarding assistant message to {}", llm.base_url);

        let response = self
            .client
            .post(llm.completions_url())
            .bearer_auth(&llm.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Status { status, body });
        }

        let completion: ChatCompletion = response.json().await?;
        let reply = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(AssistantError::EmptyReply)?;

        Ok(AssistantReply {
            reply,
            source: ReplySource::Llm,
        })
    }
}

/// Picks the first topic with a keyword contained in the message.
pub fn canned_reply(message: &str) -> &'static str {
    let message = message.to_lowercase();
    TOPICS
        .iter()
        .find(|topic| topic.keywords.iter().any(|k| message.contains(k)))
        .map_or(FALLBACK_REPLY, |topic| topic.reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_topics_case_insensitively() {
        assert_eq!(canned_reply("Como montar meu CRONOGRAMA?"), TOPICS[0].reply);
        assert_eq!(canned_reply("quando faço a Revisão?"), TOPICS[1].reply);
        assert_eq!(canned_reply("Tem simulado essa semana?"), TOPICS[2].reply);
        assert_eq!(canned_reply("qual meu progresso"), TOPICS[3].reply);
    }

    #[test]
    fn unknown_topic_falls_back() {
        assert_eq!(canned_reply("olá"), FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn unconfigured_assistant_uses_templates() {
        let assistant = Assistant::new(None).unwrap();
        let reply = assistant.reply("preciso revisar").await.unwrap();
        assert_eq!(reply.source, ReplySource::Template);
        assert_eq!(reply.reply, TOPICS[1].reply);
    }
}
