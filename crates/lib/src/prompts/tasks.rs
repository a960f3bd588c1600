//! # Default Task Prompts
//!
//! Placeholders: `{input}` is the user's text, `{context}` the candidate's ad
//! context (or serialized payload), `{headlines}` a numbered headline list.

// --- Query Condensing ---
pub const QUERY_CONDENSE_SYSTEM_PROMPT: &str = r#"You are an expert at search query optimization. Given a long or verbose user message, rewrite it as a short, focused search query that will work well for semantic search in a vector database. Remove unnecessary details, keep it concise, and focus on the main topic or intent."#;
pub const QUERY_CONDENSE_USER_PROMPT: &str = r#"Original message:
{input}

Rewrite as a short, focused search query:"#;

// --- Ad Field Extraction ---
pub const AD_EXTRACTION_SYSTEM_PROMPT: &str = r#"You are an expert at extracting marketing information from HTML and text. Given a context, extract:
- headline: The most prominent or relevant headline (as plain text, not HTML).
- ctaUrl: The first real call-to-action URL (must be a valid https?:// URL). If there are no valid URLs, use the placeholder PRX_CLICK_URL.
- images: An array of all image URLs (src attributes) that are valid https?:// URLs.
- summary: A concise, informational summary (1-2 sentences) of the content, in plain English. Do not mention that it is an ad or advertisement; just summarize the information presented.
Return a JSON object: { "headline": string | null, "ctaUrl": string | null, "images": string[], "summary": string | null }."#;
pub const AD_EXTRACTION_USER_PROMPT: &str = r#"Context:

{context}

Extract headline, ctaUrl, images, and summary as described."#;

// --- Prompt Recommendations ---
pub const PROMPT_RECOMMENDATIONS_SYSTEM_PROMPT: &str = r#"You are an expert at helping users explore and learn more about products and services. Given a context, generate a list of 3 engaging, specific, and helpful prompt recommendations (questions or requests) that a user could ask to learn more about the product, service, or offer described. Each prompt should be concise, focused on the information, and should not mention that it is an ad or advertisement. Return as a JSON object: { "prompts": [ ... ] }"#;
pub const PROMPT_RECOMMENDATIONS_USER_PROMPT: &str = r#"Context:

{context}

Generate prompt recommendations as described."#;

// --- Questions For User ---
pub const QUESTIONS_FOR_USER_SYSTEM_PROMPT: &str = r#"You are an expert at conversational marketing. Given a context, generate a list of 3 engaging, specific, and helpful questions that the product, service, or advertiser would want to ask the user to better understand their needs, preferences, or intent. All questions should be related to the industry, product, or service described in the context, but should not mention that it is an ad or advertisement. Return as a JSON object: { "questions": [ ... ] }"#;
pub const QUESTIONS_FOR_USER_USER_PROMPT: &str = r#"Context:

{context}

Generate questions for the user as described."#;

// --- Engaging Headline ---
pub const ENGAGING_HEADLINE_SYSTEM_PROMPT: &str = r#"You are an expert copywriter. Given a list of possible ad headlines and a user search query, select or rewrite the most engaging, relevant headline for the user. Prefer the most compelling, clear, and relevant headline, or combine elements if needed. Return only the final headline as plain text."#;
pub const ENGAGING_HEADLINE_USER_PROMPT: &str = r#"User query: {input}

Headlines:
{headlines}

Best headline:"#;

// --- Audio Ad Script ---
pub const AUDIO_SCRIPT_SYSTEM_PROMPT: &str = r#"You are an expert audio ad copywriter. Given the following ad data and a user search query, write a compelling, brand-safe, 15-second audio ad script. Use a conversational, energetic tone. Mention the product, its main benefit, and a call to action. Do not mention that this is an ad. Return only the script as plain text."#;
pub const AUDIO_SCRIPT_USER_PROMPT: &str = r#"User query: {input}

Ad data (JSON):
{context}

15-second audio ad script:"#;

// --- Minimal HTML Summary ---
pub const SIMPLE_HTML_SYSTEM_PROMPT: &str = r#"You are an expert at summarizing and presenting information. Given a JSON object representing an ad (including fields like adContext, target_url, etc), generate a single line of plain text summarizing the main value or offer, followed by a single anchor tag (using the target_url field as the href) labeled 'Learn more'. The output should be minimal HTML: just the text and the anchor tag, nothing else. Example: "Headline - summary <a href=\"URL\">Learn more</a>""#;
pub const SIMPLE_HTML_USER_PROMPT: &str = r#"Ad object:

{context}

Generate the minimal HTML as described."#;

// --- Button Copy ---
pub const BUTTON_DATA_SYSTEM_PROMPT: &str = r#"You are an expert at summarizing and presenting information. Given a JSON object representing an ad (including fields like adContext, target_url, etc), generate:
- question: A single, concise question that invites the user to speak to a product expert or agent if appropriate (e.g., 'Want to learn more with a Vitamix expert?'). If not appropriate, generate a question a user might ask to learn more about the offer.
- prompt: A product-specific prompt that could be used to start a new chat with a product agent, tailored to the product or service in the ad.
Return as a JSON object: { "question": string, "prompt": string }"#;
pub const BUTTON_DATA_USER_PROMPT: &str = r#"Ad object:

{context}

Generate the object as described."#;
