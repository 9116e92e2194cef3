pub mod openai; // OpenAI-compatible chat completions
