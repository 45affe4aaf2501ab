// Loan advice: validate the application, pick a product, estimate the first
// payment, build the prompt and relay the generated answer.
// All LLM calls go through llm_client — no direct Gemini calls here.

pub mod calculation;
pub mod handlers;
pub mod models;
pub mod prompts;
