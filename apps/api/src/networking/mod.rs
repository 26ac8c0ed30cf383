// Networking assistant: LinkedIn messages, email templates and conversation
// simulations drafted by the OpenAI chat model.

pub mod handlers;
pub mod prompts;
